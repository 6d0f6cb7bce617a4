use crate::domain::command::CommandReply;
use crate::domain::jobs::{StatusResponse, SubmitResponse};
use crate::domain::video::VideoRequest;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a usable response (connection, timeout, bad body).
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("prompt is empty")]
    EmptyPrompt,
}

/// The generation backend as seen from the client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationApi: Send + Sync {
    /// Send free text to the command parser
    async fn command(&self, message: &str) -> Result<CommandReply, ClientError>;

    /// Start a generation
    async fn generate(&self, request: &VideoRequest) -> Result<SubmitResponse, ClientError>;

    /// Check a job by id
    async fn status(&self, id: &str) -> Result<StatusResponse, ClientError>;
}
