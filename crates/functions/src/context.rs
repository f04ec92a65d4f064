//! Per-process wiring: configuration, AWS config and the secret store.
//!
//! Everything that holds credentials or connections is built on demand by
//! the binaries, per invocation, and dropped when the invocation ends.

use pressline_cloud::{load_aws_config, load_secret, S3ObjectStore, SecretsManagerStore};
use pressline_db::DbPool;
use pressline_events::SnsPublisher;
use pressline_social::bigquery::BigQueryClient;
use pressline_social::bluesky::BlueskyClient;
use pressline_social::misskey::MisskeyClient;
use pressline_social::openai::{self, OpenAiClient};
use pressline_social::poster::{BlueskyPoster, MisskeyPoster, TwitterPoster};
use pressline_social::twitter::TwitterClient;

use crate::cards::{FontTableCardRenderer, FontTitleCardRenderer};
use crate::config::FunctionConfig;
use crate::error::FunctionResult;
use crate::secrets::{
    BlueskySecret, DatabaseSecret, MisskeySecret, OpenAiSecret, R2Secret, ServiceAccountKey, TwitterSecret,
    WarehouseSecret,
};

pub struct FunctionContext {
    pub config: FunctionConfig,
    pub aws: aws_config::SdkConfig,
    pub secrets: SecretsManagerStore,
    pub http: reqwest::Client,
}

impl FunctionContext {
    pub async fn from_env() -> FunctionResult<Self> {
        let config = FunctionConfig::from_env()?;
        let aws = load_aws_config(Some(&config.aws_region)).await;
        let secrets = SecretsManagerStore::from_config(&aws);
        let http = pressline_social::build_client()?;
        tracing::info!(region = %config.aws_region, dry_run = config.dry_run, "Loaded function configuration");
        Ok(Self {
            config,
            aws,
            secrets,
            http,
        })
    }

    /// Open a pool to the content database. Callers close it when done.
    pub async fn connect_db(&self) -> FunctionResult<DbPool> {
        let secret: DatabaseSecret = load_secret(&self.secrets, &self.config.database_secret_id).await?;
        let pool = pressline_db::create_pool(&secret.url()).await?;
        pressline_db::health_check(&pool).await?;
        Ok(pool)
    }

    pub async fn warehouse_secret(&self) -> FunctionResult<WarehouseSecret> {
        Ok(load_secret(&self.secrets, &self.config.warehouse_secret_id).await?)
    }

    pub fn publisher(&self) -> SnsPublisher {
        SnsPublisher::new(aws_sdk_sns::Client::new(&self.aws), &self.config.social_topic_arn)
    }

    pub fn og_store(&self) -> S3ObjectStore {
        S3ObjectStore::aws(&self.aws, &self.config.og_bucket, &self.config.aws_region)
    }

    pub async fn blog_store(&self) -> FunctionResult<S3ObjectStore> {
        let r2: R2Secret = load_secret(&self.secrets, &self.config.r2_secret_id).await?;
        let public_base = self
            .config
            .blog_asset_base_url
            .clone()
            .unwrap_or_else(|| format!("{}/{}", r2.endpoint_url.trim_end_matches('/'), r2.bucket));
        Ok(S3ObjectStore::r2(&r2, public_base))
    }

    pub async fn twitter(&self) -> FunctionResult<TwitterPoster> {
        let secret: TwitterSecret = load_secret(&self.secrets, &self.config.twitter_secret_id).await?;
        Ok(TwitterPoster::new(TwitterClient::new(self.http.clone(), secret)))
    }

    pub async fn misskey(&self) -> FunctionResult<MisskeyPoster> {
        let secret: MisskeySecret = load_secret(&self.secrets, &self.config.misskey_secret_id).await?;
        Ok(MisskeyPoster::new(MisskeyClient::new(
            self.http.clone(),
            &self.config.misskey_base_url,
            secret,
        )))
    }

    pub async fn bluesky(&self) -> FunctionResult<BlueskyPoster> {
        let secret: BlueskySecret = load_secret(&self.secrets, &self.config.bluesky_secret_id).await?;
        Ok(BlueskyPoster::new(
            BlueskyClient::new(self.http.clone(), &self.config.bluesky_service_url),
            secret,
        ))
    }

    pub async fn openai(&self) -> FunctionResult<OpenAiClient> {
        let secret: OpenAiSecret = load_secret(&self.secrets, &self.config.openai_secret_id).await?;
        Ok(OpenAiClient::new(self.http.clone(), openai::API_BASE, secret))
    }

    pub async fn bigquery(&self) -> FunctionResult<BigQueryClient> {
        let key: ServiceAccountKey = load_secret(&self.secrets, &self.config.bigquery_secret_id).await?;
        Ok(BigQueryClient::new(self.http.clone(), key))
    }

    pub fn table_card_renderer(&self) -> FunctionResult<FontTableCardRenderer> {
        Ok(FontTableCardRenderer::load(&self.config.card_font_path, &self.config.tmp_dir)?)
    }

    pub fn title_card_renderer(&self) -> FunctionResult<FontTitleCardRenderer> {
        Ok(FontTitleCardRenderer::load(
            &self.config.title_serif_font_path,
            &self.config.title_sans_font_path,
            &self.config.tmp_dir,
        )?)
    }
}
