use aws_lambda_events::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::encodings::Body;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use pressline_functions::handlers::create_blog_og_image::{self, BlogImageRequest, BlogImageResponse};
use pressline_functions::{telemetry, FunctionContext, FunctionError};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let ctx = FunctionContext::from_env().await?;
    let ctx = &ctx;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<ApiGatewayProxyRequest>| async move {
        handle(ctx, event.payload).await
    }))
    .await
}

async fn handle(ctx: &FunctionContext, request: ApiGatewayProxyRequest) -> Result<ApiGatewayProxyResponse, Error> {
    let outcome = async {
        let request = BlogImageRequest::from_body(request.body.as_deref().unwrap_or_default())?;
        let renderer = ctx.title_card_renderer()?;
        let store = ctx.blog_store().await?;
        create_blog_og_image::run(&renderer, &store, &request).await
    }
    .await;

    let (status, body) = match outcome {
        Ok(response) => (200, response),
        Err(FunctionError::BadRequest(message)) => (400, BlogImageResponse::error(message)),
        Err(e) => {
            tracing::error!(error = %e, "Blog OG image creation failed");
            (500, BlogImageResponse::error("画像をR2にアップロードできませんでした"))
        }
    };

    Ok(ApiGatewayProxyResponse {
        status_code: status,
        body: Some(Body::Text(serde_json::to_string(&body)?)),
        ..Default::default()
    })
}
