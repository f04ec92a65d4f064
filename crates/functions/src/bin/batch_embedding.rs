use lambda_runtime::{service_fn, Error, LambdaEvent};
use pressline_functions::handlers::batch_embedding::{self, EmbeddingReport};
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

async fn handle(ctx: &FunctionContext) -> Result<EmbeddingReport, Error> {
    let pool = ctx.connect_db().await?;
    let openai = ctx.openai().await?;
    let result = batch_embedding::run(&pool, &openai).await;
    pool.close().await;
    Ok(result?)
}
