use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str =
    "pressline_functions=info,pressline_social=info,pressline_cloud=info,pressline_events=info";

/// Install the global subscriber.
///
/// Inside Lambda (`AWS_LAMBDA_FUNCTION_NAME` set) logs are emitted as JSON
/// without timestamps, since CloudWatch stamps every line itself.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var_os("AWS_LAMBDA_FUNCTION_NAME").is_some() {
        registry
            .with(tracing_subscriber::fmt::layer().json().without_time().with_current_span(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
