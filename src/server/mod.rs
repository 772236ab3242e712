pub mod pages;

use anyhow::Context;
use axum::Router;
use axum::extract::{Path as AxumPath, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::net::SocketAddr;
use tokio::task;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::dashboard::Dashboard;
use crate::models::Pipeline;

/// Error returned from handlers: logged, then reported as a bare 500
pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Routes for the pages, the three image directories and the generated charts
pub fn router(dashboard: Dashboard) -> Router {
    let config = dashboard.config().clone();

    let mut app: Router<Dashboard> = Router::new()
        .route("/", get(index))
        .route("/compare/:stem", get(compare))
        .route("/healthz", get(healthz));

    for pipeline in Pipeline::ALL {
        app = app.nest_service(
            &format!("/{}", pipeline.image_route()),
            ServeDir::new(&config.dirs(pipeline).images),
        );
    }

    app.nest_service("/static/plots", ServeDir::new(&config.plots_dir))
        .with_state(dashboard)
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(dashboard: Dashboard, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("listening on http://{}", listener.local_addr()?);
    info!("compare url: http://{}/compare/<stem>", addr);

    axum::serve(listener, router(dashboard))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn index(State(dashboard): State<Dashboard>) -> Result<Html<String>, AppError> {
    let stems = task::spawn_blocking(move || dashboard.index()).await??;
    Ok(Html(pages::index_page(&stems)))
}

async fn compare(
    State(dashboard): State<Dashboard>,
    AxumPath(stem): AxumPath<String>,
) -> Result<Html<String>, AppError> {
    let result = task::spawn_blocking(move || dashboard.compare(&stem)).await??;
    Ok(Html(pages::compare_page(&result)))
}
