//! Outbound HTTP adapter for [`GenerationApi`].

use crate::domain::command::CommandReply;
use crate::domain::jobs::{StatusResponse, SubmitResponse};
use crate::domain::video::VideoRequest;
use crate::ports::generation::{ClientError, GenerationApi};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct CommandBody<'a> {
    message: &'a str,
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Transport(error.to_string())
    }
}

#[derive(Clone, Debug)]
pub struct HttpGenerationApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGenerationApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl GenerationApi for HttpGenerationApi {
    async fn command(&self, message: &str) -> Result<CommandReply, ClientError> {
        let response = self
            .client
            .post(self.url("/command"))
            .json(&CommandBody { message })
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn generate(&self, request: &VideoRequest) -> Result<SubmitResponse, ClientError> {
        debug!(
            duration = %request.duration_seconds,
            aspect = %request.aspect_ratio,
            "Submitting generation"
        );
        let response = self
            .client
            .post(self.url("/generate"))
            .json(request)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn status(&self, id: &str) -> Result<StatusResponse, ClientError> {
        let response = self
            .client
            .get(self.url("/generate"))
            .query(&[("id", id)])
            .send()
            .await?;
        Self::read_json(response).await
    }
}
