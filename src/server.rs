use crate::compose::{build_legend, Legend};
use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::feed::FeedFetcher;
use crate::pipeline::render_map;
use crate::render::{render_error_page, render_page};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct AppState<F> {
    pub config: AppConfig,
    pub fetcher: F,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Pipeline(e) => (
                StatusCode::BAD_GATEWAY,
                serde_json::json!({
                    "error": e.source.to_string(),
                    "stage": e.stage,
                    "status": StatusCode::BAD_GATEWAY.as_u16(),
                }),
            ),
            Self::Template(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": e.to_string(),
                    "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub fn build_router<F: FeedFetcher + 'static>(state: Arc<AppState<F>>) -> Router {
    Router::new()
        .route("/", get(index_handler::<F>))
        .route("/api/map", get(map_handler::<F>))
        .route("/api/legend", get(legend_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server<F: FeedFetcher + 'static>(config: AppConfig, fetcher: F) -> Result<()> {
    let port = config.server.port;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let state = Arc::new(AppState { config, fetcher });

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

// Every request is a fresh fetch and build.
async fn index_handler<F: FeedFetcher>(
    State(state): State<Arc<AppState<F>>>,
) -> Result<Response, ServerError> {
    match render_map(&state.config, &state.fetcher).await {
        Ok(view) => Ok(Html(render_page(&view)?).into_response()),
        Err(e) => {
            let page = render_error_page(&state.config.map.container_id, &e)?;
            Ok((StatusCode::BAD_GATEWAY, Html(page)).into_response())
        }
    }
}

async fn map_handler<F: FeedFetcher>(
    State(state): State<Arc<AppState<F>>>,
) -> Result<Response, ServerError> {
    let view = render_map(&state.config, &state.fetcher).await?;
    Ok(Json(view).into_response())
}

async fn legend_handler() -> Json<Legend> {
    Json(build_legend())
}
