use lambda_runtime::{service_fn, Error, LambdaEvent};
use pressline_functions::handlers::report_weekly_summary;
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

async fn handle(ctx: &FunctionContext) -> Result<Option<String>, Error> {
    let warehouse = ctx.bigquery().await?;
    let twitter = ctx.twitter().await?;
    Ok(report_weekly_summary::run(
        &warehouse,
        &twitter,
        &ctx.config.report_dataset,
        &ctx.config.site_base_url,
    )
    .await?)
}
