use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use pressline_functions::handlers::export_tables::{self, ExportReport};
use pressline_functions::{telemetry, FunctionContext};
use pressline_social::bigquery::BigQueryClient;

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

async fn handle(ctx: &FunctionContext) -> Result<ExportReport, Error> {
    let secret = ctx.warehouse_secret().await?;
    let warehouse = Arc::new(BigQueryClient::new(ctx.http.clone(), secret.service_account));
    let pool = pressline_db::create_pool(&secret.connection_string).await?;

    let result = export_tables::run(
        &pool,
        warehouse,
        &ctx.config.export_dataset,
        ctx.config.export_concurrency,
    )
    .await;
    pool.close().await;
    Ok(result?)
}
