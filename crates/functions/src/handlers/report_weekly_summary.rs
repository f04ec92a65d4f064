//! Tweet the week's most popular posts.

use serde::Deserialize;

use pressline_core::post_text::{weekly_summary_text, SummaryEntry};
use pressline_core::site::article_url;
use pressline_core::types::DbId;
use pressline_social::bigquery::BigQueryClient;
use pressline_social::{SocialPost, SocialPoster};

use crate::error::FunctionResult;

/// A ranked row of the weekly summary view.
#[derive(Debug, Clone, Deserialize)]
pub struct WeeklySummaryRow {
    pub post_id: DbId,
    pub post_title: String,
}

pub fn weekly_summary_query(report_dataset: &str) -> String {
    format!("SELECT * FROM `{report_dataset}.report_weekly_summary`")
}

/// Returns the tweeted text, or `None` when the view is empty.
pub async fn run(
    warehouse: &BigQueryClient,
    twitter: &dyn SocialPoster,
    report_dataset: &str,
    site_base_url: &str,
) -> FunctionResult<Option<String>> {
    let rows: Vec<WeeklySummaryRow> = warehouse.query(&weekly_summary_query(report_dataset)).await?;
    if rows.is_empty() {
        tracing::info!("Weekly summary is empty, nothing tweeted");
        return Ok(None);
    }

    let entries: Vec<SummaryEntry> = rows
        .iter()
        .map(|row| SummaryEntry {
            title: row.post_title.clone(),
            url: article_url(site_base_url, row.post_id),
        })
        .collect();
    let text = weekly_summary_text(&entries);

    let tweet_id = twitter.post(&SocialPost::text(text.clone())).await?;
    tracing::info!(tweet_id = %tweet_id, ranked = rows.len(), "Tweeted weekly summary");
    Ok(Some(text))
}
