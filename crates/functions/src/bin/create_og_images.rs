use lambda_runtime::{service_fn, Error, LambdaEvent};
use pressline_functions::handlers::create_og_images::{self, OgImageReport};
use pressline_functions::handlers::CardPublisher;
use pressline_functions::{telemetry, FunctionContext};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let ctx = FunctionContext::from_env().await?;
    let ctx = &ctx;
    lambda_runtime::run(service_fn(move |_: LambdaEvent<serde_json::Value>| async move {
        handle(ctx).await
    }))
    .await
}

async fn handle(ctx: &FunctionContext) -> Result<OgImageReport, Error> {
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
    let result = create_og_images::run(&cards).await;
    pool.close().await;
    Ok(result?)
}
