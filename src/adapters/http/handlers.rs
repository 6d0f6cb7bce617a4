use super::error::ApiError;
use crate::application::jobs::JobService;
use crate::domain::command::{self, CommandReply};
use crate::domain::jobs::{StatusResponse, SubmitResponse};
use crate::domain::video::{text_of, GenerateBody};
use crate::ports::clock::Clock;
use crate::ports::provider::VideoProvider;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CommandBody {
    #[serde(default)]
    pub message: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub id: Option<String>,
}

// POST /command
pub async fn command(Json(body): Json<CommandBody>) -> Json<CommandReply> {
    Json(command::interpret(&text_of(body.message.as_ref())))
}

// POST /generate
pub async fn submit<C, P>(
    State(service): State<Arc<JobService<C, P>>>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<SubmitResponse>, ApiError>
where
    C: Clock,
    P: VideoProvider,
{
    let request = body.normalize();
    let response = service
        .submit(&request)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(response))
}

// GET /generate?id=<token>
pub async fn status<C, P>(
    State(service): State<Arc<JobService<C, P>>>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, ApiError>
where
    C: Clock,
    P: VideoProvider,
{
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingId)?;
    let response = service.status(&id).map_err(ApiError::InvalidId)?;
    Ok(Json(response))
}

pub async fn health() -> &'static str {
    "ok"
}
