use lambda_runtime::{service_fn, Error, LambdaEvent};
use pressline_events::{first_sns_message, SnsEvent};
use pressline_functions::handlers::save_social_ids;
use pressline_functions::{telemetry, FunctionContext};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let ctx = FunctionContext::from_env().await?;
    let ctx = &ctx;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<SnsEvent>| async move {
        handle(ctx, event.payload).await
    }))
    .await
}

async fn handle(ctx: &FunctionContext, event: SnsEvent) -> Result<bool, Error> {
    let record = first_sns_message(&event)?.into_social_post_recorded()?;
    let pool = ctx.connect_db().await?;
    let result = save_social_ids::run(&pool, &record).await;
    pool.close().await;
    Ok(result?)
}
