use std::path::PathBuf;

use pressline_core::site::DEFAULT_SITE_BASE_URL;

use crate::error::FunctionError;

/// Function configuration loaded from environment variables.
///
/// Only addressing and tuning live here. Credentials are fetched from the
/// secret store at invocation time under the ids configured below.
#[derive(Debug, Clone)]
pub struct FunctionConfig {
    pub aws_region: String,

    pub database_secret_id: String,
    pub twitter_secret_id: String,
    pub misskey_secret_id: String,
    pub bluesky_secret_id: String,
    pub openai_secret_id: String,
    pub bigquery_secret_id: String,
    pub warehouse_secret_id: String,
    pub r2_secret_id: String,

    /// SNS topic every announcement and social-id record is published on.
    pub social_topic_arn: String,
    /// Public S3 bucket receiving article cards.
    pub og_bucket: String,
    /// Public origin of blog cards uploaded to R2. Defaults to
    /// `{R2_ENDPOINT_URL}/{R2_BUCKET_NAME}` when unset.
    pub blog_asset_base_url: Option<String>,
    pub site_base_url: String,

    pub card_font_path: PathBuf,
    pub title_serif_font_path: PathBuf,
    pub title_sans_font_path: PathBuf,
    /// Scratch directory for rendered images.
    pub tmp_dir: PathBuf,

    pub misskey_base_url: String,
    pub bluesky_service_url: String,

    /// Fully-qualified BigQuery dataset holding the report views.
    pub report_dataset: String,
    /// BigQuery dataset the table export replaces tables in.
    pub export_dataset: String,
    /// Maximum number of tables exported at once.
    pub export_concurrency: usize,

    /// Render and upload cards without touching the database or the topic.
    pub dry_run: bool,
}

impl FunctionConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                  | Default                                         |
    /// |--------------------------|-------------------------------------------------|
    /// | `AWS_REGION`             | `ap-northeast-1`                                |
    /// | `DATABASE_SECRET_ID`     | `SUPABASE_CONNECTION_SECRET`                    |
    /// | `TWITTER_SECRET_ID`      | `hpe-twitter-bot-tokens`                        |
    /// | `MISSKEY_SECRET_ID`      | `MISSKEY_TOKEN`                                 |
    /// | `BLUESKY_SECRET_ID`      | `hpe-bluesky-bot-tokens`                        |
    /// | `OPENAI_SECRET_ID`       | `OPENAI_API_KEY`                                |
    /// | `BIGQUERY_SECRET_ID`     | `BIGQUERY_ACCESS_CREDENTIAL`                    |
    /// | `WAREHOUSE_SECRET_ID`    | `DLT_CONNECTION_PARAMS`                         |
    /// | `R2_SECRET_ID`           | `my-toilet-blogs-r2-credentials`                |
    /// | `SOCIAL_TOPIC_ARN`       | the `healthy-person-emulator-socialpost` topic  |
    /// | `OG_BUCKET`              | `healthy-person-emulator-public-assets`         |
    /// | `BLOG_ASSET_BASE_URL`    | unset                                           |
    /// | `SITE_BASE_URL`          | `https://healthy-person-emulator.org`           |
    /// | `CARD_FONT_PATH`         | `./BIZ-UDGOTHICB.TTC`                           |
    /// | `TITLE_SERIF_FONT_PATH`  | `./Kokoro.otf`                                  |
    /// | `TITLE_SANS_FONT_PATH`   | `./BIZ-UDGOTHICB.TTC`                           |
    /// | `TMP_DIR`                | `/tmp`                                          |
    /// | `MISSKEY_BASE_URL`       | `https://misskey.io`                            |
    /// | `BLUESKY_SERVICE_URL`    | `https://bsky.social`                           |
    /// | `REPORT_DATASET`         | `healthy-person-emulator.dbt_sora32127`         |
    /// | `EXPORT_DATASET`         | `HPE_RAW`                                       |
    /// | `EXPORT_CONCURRENCY`     | `4`                                             |
    /// | `DRY_RUN`                | `false`                                         |
    pub fn from_env() -> Result<Self, FunctionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, FunctionError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let export_concurrency: usize = var("EXPORT_CONCURRENCY", "4")
            .parse()
            .map_err(|_| FunctionError::Config("EXPORT_CONCURRENCY must be a positive integer".into()))?;
        if export_concurrency == 0 {
            return Err(FunctionError::Config("EXPORT_CONCURRENCY must be at least 1".into()));
        }

        let dry_run = match var("DRY_RUN", "false").to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" | "" => false,
            other => {
                return Err(FunctionError::Config(format!(
                    "DRY_RUN must be true or false, got '{other}'"
                )))
            }
        };

        Ok(Self {
            aws_region: var("AWS_REGION", "ap-northeast-1"),
            database_secret_id: var("DATABASE_SECRET_ID", "SUPABASE_CONNECTION_SECRET"),
            twitter_secret_id: var("TWITTER_SECRET_ID", "hpe-twitter-bot-tokens"),
            misskey_secret_id: var("MISSKEY_SECRET_ID", "MISSKEY_TOKEN"),
            bluesky_secret_id: var("BLUESKY_SECRET_ID", "hpe-bluesky-bot-tokens"),
            openai_secret_id: var("OPENAI_SECRET_ID", "OPENAI_API_KEY"),
            bigquery_secret_id: var("BIGQUERY_SECRET_ID", "BIGQUERY_ACCESS_CREDENTIAL"),
            warehouse_secret_id: var("WAREHOUSE_SECRET_ID", "DLT_CONNECTION_PARAMS"),
            r2_secret_id: var("R2_SECRET_ID", "my-toilet-blogs-r2-credentials"),
            social_topic_arn: var(
                "SOCIAL_TOPIC_ARN",
                "arn:aws:sns:ap-northeast-1:662924458234:healthy-person-emulator-socialpost",
            ),
            og_bucket: var("OG_BUCKET", "healthy-person-emulator-public-assets"),
            blog_asset_base_url: lookup("BLOG_ASSET_BASE_URL").filter(|v| !v.is_empty()),
            site_base_url: var("SITE_BASE_URL", DEFAULT_SITE_BASE_URL),
            card_font_path: var("CARD_FONT_PATH", "./BIZ-UDGOTHICB.TTC").into(),
            title_serif_font_path: var("TITLE_SERIF_FONT_PATH", "./Kokoro.otf").into(),
            title_sans_font_path: var("TITLE_SANS_FONT_PATH", "./BIZ-UDGOTHICB.TTC").into(),
            tmp_dir: var("TMP_DIR", "/tmp").into(),
            misskey_base_url: var("MISSKEY_BASE_URL", pressline_social::misskey::DEFAULT_INSTANCE),
            bluesky_service_url: var("BLUESKY_SERVICE_URL", pressline_social::bluesky::DEFAULT_SERVICE),
            report_dataset: var("REPORT_DATASET", "healthy-person-emulator.dbt_sora32127"),
            export_dataset: var("EXPORT_DATASET", "HPE_RAW"),
            export_concurrency,
            dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<FunctionConfig, FunctionError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        FunctionConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.aws_region, "ap-northeast-1");
        assert_eq!(config.site_base_url, "https://healthy-person-emulator.org");
        assert_eq!(config.export_dataset, "HPE_RAW");
        assert_eq!(config.export_concurrency, 4);
        assert_eq!(config.tmp_dir, PathBuf::from("/tmp"));
        assert!(config.blog_asset_base_url.is_none());
        assert!(!config.dry_run);
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("OG_BUCKET", "staging-assets"),
            ("EXPORT_CONCURRENCY", "8"),
            ("DRY_RUN", "TRUE"),
            ("BLOG_ASSET_BASE_URL", "https://img.example"),
        ])
        .unwrap();
        assert_eq!(config.og_bucket, "staging-assets");
        assert_eq!(config.export_concurrency, 8);
        assert!(config.dry_run);
        assert_eq!(config.blog_asset_base_url.as_deref(), Some("https://img.example"));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert_matches!(load(&[("EXPORT_CONCURRENCY", "many")]), Err(FunctionError::Config(_)));
        assert_matches!(load(&[("EXPORT_CONCURRENCY", "0")]), Err(FunctionError::Config(_)));
        assert_matches!(load(&[("DRY_RUN", "maybe")]), Err(FunctionError::Config(_)));
    }
}
