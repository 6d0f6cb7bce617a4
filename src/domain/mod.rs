//! Domain layer - Pure business logic.

pub mod chat;
pub mod command;
pub mod jobs;
pub mod video;
