use api_client::YahooClient;
use axum::{
    routing::{get, post},
    Router,
};
use charts::ChartArtifacts;
use configuration::Config;
use engine::DrawdownPipeline;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: DrawdownPipeline,
    pub artifacts: ChartArtifacts,
}

/// Builds the application routes around `state`.
///
/// Charts written by `POST /api/charts` are served back under `/static`.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    let static_files = ServeDir::new(state.artifacts.dir());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/instruments", get(handlers::list_instruments))
        .route("/api/charts", post(handlers::create_charts))
        .nest_service("/static", static_files)
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// Tracing is expected to be initialised by the caller.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let source = YahooClient::new(&config.provider)?;
    let artifacts = ChartArtifacts::new(
        config.charts.output_dir.clone(),
        (config.charts.width, config.charts.height),
    );
    std::fs::create_dir_all(artifacts.dir())?;

    let state = Arc::new(AppState {
        pipeline: DrawdownPipeline::new(Arc::new(source)),
        artifacts,
    });
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
