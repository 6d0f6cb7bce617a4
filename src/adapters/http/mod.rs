//! HTTP inbound adapter.
//!
//! Exposes the command parser and the job service:
//! - `POST /command` turns chat text into generation parameters
//! - `POST /generate` issues a job token
//! - `GET /generate?id=` reports a job's state
//! - `GET /health` liveness probe

mod error;
mod handlers;
mod middleware;

pub use error::ApiError;

use crate::application::jobs::JobService;
use crate::ports::clock::Clock;
use crate::ports::provider::VideoProvider;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn router<C, P>(service: Arc<JobService<C, P>>) -> Router
where
    C: Clock + 'static,
    P: VideoProvider + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/command", post(handlers::command))
        .route(
            "/generate",
            post(handlers::submit::<C, P>).get(handlers::status::<C, P>),
        )
        .route("/health", get(handlers::health))
        .layer(axum::middleware::from_fn(middleware::log_request_errors))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}
