//! Server Binary - mock generation API
//!
//! Wires the system clock and the canned provider into the job service and
//! serves it over HTTP.

use std::sync::Arc;
use tracing::info;
use vidgen::adapters::http;
use vidgen::adapters::system::SystemClock;
use vidgen::{JobService, ServerConfig};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env();

    vidgen::logging::init();

    let service = Arc::new(JobService::new(SystemClock::new(), config.provider()));
    let app = http::router(service);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .expect("Failed to bind TCP listener");
    info!(
        addr = %config.bind_addr(),
        provider = %config.provider_tag,
        ready_after_ms = config.ready_after_ms,
        "Listening"
    );
    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
