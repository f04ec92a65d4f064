//! Schema discovery and whole-table reads for the warehouse export.

use sqlx::PgPool;

pub struct CatalogRepo;

impl CatalogRepo {
    /// Names of all tables in the `public` schema, except the migration ledger.
    pub async fn list_public_tables(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT tablename::text FROM pg_catalog.pg_tables \
             WHERE schemaname = 'public' AND tablename <> '_sqlx_migrations' \
             ORDER BY tablename",
        )
        .fetch_all(pool)
        .await
    }

    /// Every row of `table` as a JSON object keyed by column name.
    pub async fn export_rows(pool: &PgPool, table: &str) -> Result<Vec<serde_json::Value>, sqlx::Error> {
        let query = format!(
            "SELECT row_to_json(t) FROM public.{} AS t",
            quote_identifier(table)
        );
        sqlx::query_scalar(&query).fetch_all(pool).await
    }
}

/// Double-quote an identifier, doubling any embedded quotes.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_identifier("dim_posts"), "\"dim_posts\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
