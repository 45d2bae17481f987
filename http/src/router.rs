use crate::error::AppError;
use axum::{
    extract::State,
    http::header,
    response::{
        Html,
        IntoResponse,
    },
    routing::get,
    Router,
};
use mirth_exporter_collector::Collector;
use mirth_exporter_config::HEALTH_PATH;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub collector: Arc<Collector>,
    pub telemetry_path: Arc<str>,
}

/// `telemetry_path` must start with `/` and must not collide with `/` or [`HEALTH_PATH`].
pub fn create_router(collector: Arc<Collector>, telemetry_path: &str) -> Router {
    let state = AppState {
        collector,
        telemetry_path: telemetry_path.into(),
    };

    Router::new()
        .route("/", get(landing))
        .route(HEALTH_PATH, get(healthz))
        .route(telemetry_path, get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.collector.render().await?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}

async fn landing(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>
<head><title>Mirth Exporter</title></head>
<body>
<h1>Mirth Exporter</h1>
<p><a href=\"{path}\">Metrics</a></p>
</body>
</html>
",
        path = state.telemetry_path
    ))
}

async fn healthz() -> &'static str {
    "OK"
}
