use std::{any::Any, sync::Arc};

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod metrics;

use errors::AppError;
use metrics::CpuProvider;

#[derive(Clone)]
pub struct AppState {
    pub cpu_provider: Arc<dyn CpuProvider>,
}

impl AppState {
    pub fn new(cpu_provider: Arc<dyn CpuProvider>) -> Self {
        Self { cpu_provider }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .layer(CatchPanicLayer::custom(panic_to_response))
        .with_state(state)
}

fn panic_to_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    };

    tracing::error!(error = %detail, "request handler panicked");
    AppError::internal(detail).into_response()
}
