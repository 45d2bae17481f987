use eyre::{
    Context as _,
    Result,
};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

pub const DEFAULT_LOG_FILTER: &str = "info";

/// `RUST_LOG` wins over `default_filter`, which wins over [`DEFAULT_LOG_FILTER`].
pub fn init_logging(default_filter: Option<&str>) -> Result<()> {
    let filter = if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        EnvFilter::from_default_env()
    } else {
        let directives = default_filter.unwrap_or(DEFAULT_LOG_FILTER);
        EnvFilter::try_new(directives).wrap_err_with(|| format!("Invalid log filter {directives:?}"))?
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(filter))
        .with(tracing_error::ErrorLayer::default())
        .try_init()
        .context("Failed to initialize tracing subscriber")
}
