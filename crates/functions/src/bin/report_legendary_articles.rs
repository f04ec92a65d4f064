use lambda_runtime::{service_fn, Error, LambdaEvent};
use pressline_core::types::DbId;
use pressline_functions::handlers::report_legendary_articles;
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

async fn handle(ctx: &FunctionContext) -> Result<Vec<DbId>, Error> {
    let warehouse = ctx.bigquery().await?;
    let twitter = ctx.twitter().await?;
    let pool = ctx.connect_db().await?;
    let result = report_legendary_articles::run(
        &warehouse,
        &pool,
        &twitter,
        &ctx.config.report_dataset,
        &ctx.config.site_base_url,
    )
    .await;
    pool.close().await;
    Ok(result?)
}
