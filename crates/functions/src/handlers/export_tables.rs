//! Replace every public table of the content database in the warehouse.
//!
//! One task per table, at most `concurrency` running at a time. Tasks share
//! nothing but the pool and the warehouse client; a failed table is logged
//! and reported and never cancels or delays its siblings.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};

use pressline_db::repositories::CatalogRepo;
use pressline_db::DbPool;
use pressline_social::bigquery::{BigQueryClient, TableRef};

use crate::error::FunctionResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableOutcome {
    Loaded { rows: usize, job_id: String },
    /// Empty tables are not loaded: schema autodetection needs a row.
    SkippedEmpty,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableExport {
    pub table: String,
    #[serde(flatten)]
    pub outcome: TableOutcome,
}

#[derive(Debug, Default, Serialize)]
pub struct ExportReport {
    /// Sorted by table name.
    pub tables: Vec<TableExport>,
}

impl ExportReport {
    pub fn failed(&self) -> impl Iterator<Item = &TableExport> {
        self.tables
            .iter()
            .filter(|t| matches!(t.outcome, TableOutcome::Failed { .. }))
    }
}

pub async fn run(
    pool: &DbPool,
    warehouse: Arc<BigQueryClient>,
    dataset: &str,
    concurrency: usize,
) -> FunctionResult<ExportReport> {
    let tables = CatalogRepo::list_public_tables(pool).await?;
    tracing::info!(count = tables.len(), dataset, "Exporting tables");

    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    let mut tables_by_task = HashMap::new();

    for table in tables {
        let pool = pool.clone();
        let warehouse = Arc::clone(&warehouse);
        let permits = Arc::clone(&permits);
        let dataset = dataset.to_string();

        let name = table.clone();
        let handle = tasks.spawn(async move {
            let outcome = match permits.acquire_owned().await {
                Ok(_permit) => export_table(&pool, &warehouse, &dataset, &table).await,
                Err(e) => TableOutcome::Failed { error: e.to_string() },
            };
            TableExport { table, outcome }
        });
        tables_by_task.insert(handle.id(), name);
    }

    let report = collect_exports(tasks, tables_by_task).await;
    let failed = report.failed().count();
    tracing::info!(tables = report.tables.len(), failed, "Table export finished");
    Ok(report)
}

/// Drain `tasks` into a report sorted by table name. A task that panicked
/// is reported as failed under the table it was spawned for.
async fn collect_exports(
    mut tasks: JoinSet<TableExport>,
    mut tables_by_task: HashMap<task::Id, String>,
) -> ExportReport {
    let mut report = ExportReport::default();
    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((id, export)) => {
                tables_by_task.remove(&id);
                report.tables.push(export);
            }
            Err(e) => {
                let table = tables_by_task.remove(&e.id()).unwrap_or_default();
                tracing::error!(table = %table, error = %e, "Export task panicked");
                report.tables.push(TableExport {
                    table,
                    outcome: TableOutcome::Failed { error: "task panicked".into() },
                });
            }
        }
    }
    report.tables.sort_by(|a, b| a.table.cmp(&b.table));
    report
}

async fn export_table(pool: &DbPool, warehouse: &BigQueryClient, dataset: &str, table: &str) -> TableOutcome {
    let started = std::time::Instant::now();

    let rows = match CatalogRepo::export_rows(pool, table).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(table, error = %e, "Failed to read table");
            return TableOutcome::Failed { error: e.to_string() };
        }
    };
    if rows.is_empty() {
        tracing::info!(table, "Table is empty, skipped");
        return TableOutcome::SkippedEmpty;
    }

    let destination = TableRef {
        dataset_id: dataset.to_string(),
        table_id: table.to_string(),
    };
    match warehouse.load_ndjson(&destination, &rows).await {
        Ok(job_id) => {
            tracing::info!(
                table,
                rows = rows.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Table exported"
            );
            TableOutcome::Loaded { rows: rows.len(), job_id }
        }
        Err(e) => {
            tracing::error!(table, error = %e, "Failed to load table");
            TableOutcome::Failed { error: e.to_string() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exploding_load(table: &str) -> TableExport {
        panic!("load of {table} exploded")
    }

    #[tokio::test]
    async fn panicked_task_is_reported_as_failed() {
        let mut tasks: JoinSet<TableExport> = JoinSet::new();
        let mut tables_by_task = HashMap::new();

        let handle = tasks.spawn(async {
            TableExport {
                table: "dim_posts".into(),
                outcome: TableOutcome::SkippedEmpty,
            }
        });
        tables_by_task.insert(handle.id(), "dim_posts".to_string());
        let handle = tasks.spawn(async { exploding_load("rel_post_tags") });
        tables_by_task.insert(handle.id(), "rel_post_tags".to_string());

        let report = collect_exports(tasks, tables_by_task).await;

        assert_eq!(
            report.tables,
            [
                TableExport {
                    table: "dim_posts".into(),
                    outcome: TableOutcome::SkippedEmpty,
                },
                TableExport {
                    table: "rel_post_tags".into(),
                    outcome: TableOutcome::Failed { error: "task panicked".into() },
                },
            ]
        );
        assert_eq!(report.failed().count(), 1);
    }
}
