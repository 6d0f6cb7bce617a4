//! Vidgen - Mock video generation service and chat client
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (video parameters, command parsing, job tokens, chat log)
//! - ports/: Trait definitions
//! - adapters/: Concrete implementations
//! - application/: Generic services
//! - config: Environment configuration
//!
//! # Features
//! - `server`: HTTP API (axum) serving `/command` and `/generate`
//! - `client`: reqwest client and terminal front end for the chat binary

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;

// Re-exports for convenience
pub use application::controller::{ClientController, GenerationOutcome, PollSettings};
pub use application::jobs::JobService;
pub use domain::video::{AspectRatio, ClipDuration, VideoRequest};

#[cfg(feature = "server")]
pub use config::ServerConfig;

#[cfg(feature = "client")]
pub use config::ClientConfig;
