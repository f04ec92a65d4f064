use lambda_runtime::{service_fn, Error, LambdaEvent};
use pressline_events::Announcement;
use pressline_functions::handlers::pick_random_article;
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

async fn handle(ctx: &FunctionContext) -> Result<Option<Announcement>, Error> {
    let publisher = ctx.publisher();
    let pool = ctx.connect_db().await?;
    let result = pick_random_article::run(&pool, &publisher, &ctx.config.site_base_url).await;
    pool.close().await;
    Ok(result?)
}
