use lambda_runtime::{service_fn, Error, LambdaEvent};
use pressline_core::types::DbId;
use pressline_events::{buffered_articles, DynamoDbStreamEvent};
use pressline_functions::handlers::{announce_buffered_article, CardPublisher};
use pressline_functions::{telemetry, FunctionContext};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let ctx = FunctionContext::from_env().await?;
    let ctx = &ctx;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<DynamoDbStreamEvent>| async move {
        handle(ctx, event.payload).await
    }))
    .await
}

async fn handle(ctx: &FunctionContext, event: DynamoDbStreamEvent) -> Result<Vec<DbId>, Error> {
    let articles = buffered_articles(&event)?;
    if articles.is_empty() {
        tracing::info!(records = event.records.len(), "No inserted articles in stream batch");
        return Ok(Vec::new());
    }

    let renderer = ctx.table_card_renderer()?;
    let store = ctx.og_store();
    let publisher = ctx.publisher();
    let pool = ctx.connect_db().await?;

    let cards = CardPublisher {
        pool: &pool,
        renderer: &renderer,
        store: &store,
        publisher: &publisher,
        site_base_url: &ctx.config.site_base_url,
        dry_run: ctx.config.dry_run,
    };
    let result = announce_buffered_article::run(&cards, &articles).await;
    pool.close().await;
    Ok(result?)
}
