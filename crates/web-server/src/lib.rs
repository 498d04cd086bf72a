use axum::{
    routing::{get, post},
    Router,
};
use analytics::ProportionZTest;
use configuration::{ChartSettings, Config, FormDefaults};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod form;
pub mod handlers;
pub mod pages;

/// The shared application state that all handlers can access.
///
/// Everything in here is read-only: each request runs its own independent calculation.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: ProportionZTest,
    pub defaults: FormDefaults,
    pub chart: ChartSettings,
}

impl AppState {
    pub fn new(defaults: FormDefaults, chart: ChartSettings) -> Self {
        Self {
            engine: ProportionZTest::new(),
            defaults,
            chart,
        }
    }
}

/// Builds the application routes on top of the given state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/", get(handlers::index))
        .route("/calculate", post(handlers::calculate))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/ztest", post(handlers::api_ztest))
        .route("/api/ztest/chart.svg", get(handlers::chart_svg))
        .with_state(Arc::new(state))
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    // Tracing is initialized by the caller; installing a second subscriber here would fail.
    let addr = config.server.socket_addr()?;
    let app = create_router(AppState::new(config.defaults, config.chart));

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
