//! Stateless job tokens.
//!
//! A job id is the whole job: the payload is serialized, tagged with a schema
//! version and base64url encoded. Nothing is stored server side, so a status
//! check only needs the id and the current time.

use super::video::{AspectRatio, ClipDuration, VideoRequest};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const VERSION_KEY: &str = "v";

const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("token payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    pub provider: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    pub ready_after_ms: u64,
    pub url: String,
    pub duration_seconds: ClipDuration,
    pub aspect_ratio: AspectRatio,
    pub prompt: String,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "v")]
enum VersionedPayload {
    #[serde(rename = "1")]
    V1(JobPayload),
}

impl JobPayload {
    pub fn new(
        provider: &str,
        created_at: u64,
        ready_after_ms: u64,
        url: &str,
        request: &VideoRequest,
    ) -> Self {
        Self {
            provider: provider.to_string(),
            created_at,
            ready_after_ms,
            url: url.to_string(),
            duration_seconds: request.duration_seconds,
            aspect_ratio: request.aspect_ratio,
            prompt: request.prompt.clone(),
        }
    }

    pub fn encode(&self) -> Result<String, TokenError> {
        let json = serde_json::to_vec(&VersionedPayload::V1(self.clone()))?;
        Ok(TOKEN_ENGINE.encode(json))
    }

    /// Unversioned tokens predate the `v` tag and are read as version 1.
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let bytes = TOKEN_ENGINE.decode(token.trim())?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        if value.get(VERSION_KEY).is_some() {
            match serde_json::from_value::<VersionedPayload>(value)? {
                VersionedPayload::V1(payload) => Ok(payload),
            }
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }

    pub fn ready_at(&self) -> u64 {
        self.created_at.saturating_add(self.ready_after_ms)
    }

    /// A creation time in the future counts as no time elapsed.
    pub fn state_at(&self, now_ms: u64) -> JobState {
        let elapsed = now_ms.saturating_sub(self.created_at);
        if elapsed < self.ready_after_ms {
            JobState::Processing
        } else {
            JobState::Completed {
                url: self.url.clone(),
                duration_seconds: self.duration_seconds,
                aspect_ratio: self.aspect_ratio,
                provider: self.provider.clone(),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPhase {
    Processing,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobState {
    Processing,
    Completed {
        url: String,
        #[serde(rename = "durationSeconds")]
        duration_seconds: ClipDuration,
        #[serde(rename = "aspectRatio")]
        aspect_ratio: AspectRatio,
        provider: String,
    },
}

impl JobState {
    pub fn url(&self) -> Option<&str> {
        match self {
            JobState::Processing => None,
            JobState::Completed { url, .. } => Some(url),
        }
    }
}

/// Response of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub id: String,
    pub status: JobPhase,
    /// Set only by providers that can answer synchronously.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SubmitResponse {
    pub fn processing(id: String) -> Self {
        Self {
            id,
            status: JobPhase::Processing,
            url: None,
        }
    }
}

/// Response of `GET /generate?id=...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub id: String,
    #[serde(flatten)]
    pub state: JobState,
}
