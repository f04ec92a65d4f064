use lambda_runtime::{service_fn, Error, LambdaEvent};
use pressline_events::{first_sns_message, SnsEvent};
use pressline_functions::handlers::post_to_social;
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

async fn handle(ctx: &FunctionContext, event: SnsEvent) -> Result<String, Error> {
    let announcement = first_sns_message(&event)?.into_announcement()?;
    let poster = ctx.twitter().await?;
    let publisher = ctx.publisher();
    Ok(post_to_social::run(&poster, &ctx.http, &publisher, &announcement).await?)
}
