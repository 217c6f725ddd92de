use crate::error::PollError;
use crate::service::PollService;
use crate::store::{NewPoll, Poll};
use axum::{
    extract::{Extension, Json, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub option_id: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub polls: usize,
    pub observers: usize,
}

pub async fn health(Extension(service): Extension<PollService>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Server is running",
        polls: service.poll_count().await,
        observers: service.observer_count(),
    })
}

/// All polls keyed by id
pub async fn list_polls(Extension(service): Extension<PollService>) -> impl IntoResponse {
    let polls: BTreeMap<String, Poll> = service
        .list_polls()
        .await
        .into_iter()
        .map(|poll| (poll.id.clone(), poll))
        .collect();

    (StatusCode::OK, Json(polls))
}

/// Create a new poll and announce it to every observer
pub async fn create_poll(
    Extension(service): Extension<PollService>,
    payload: Result<Json<NewPoll>, JsonRejection>,
) -> Result<impl IntoResponse, PollError> {
    let Json(payload) = payload?;
    let poll = service.create_poll(payload).await?;

    Ok((StatusCode::CREATED, Json(poll)))
}

pub async fn get_poll(
    Extension(service): Extension<PollService>,
    Path(poll_id): Path<String>,
) -> Result<impl IntoResponse, PollError> {
    let poll = service
        .get_poll(&poll_id)
        .await
        .ok_or(PollError::PollNotFound)?;

    Ok((StatusCode::OK, Json(poll)))
}

/// Cast a vote on a poll option
pub async fn vote_on_poll(
    Extension(service): Extension<PollService>,
    Path(poll_id): Path<String>,
    payload: Result<Json<CastVoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PollError> {
    // An unknown poll is reported before a malformed body.
    if service.get_poll(&poll_id).await.is_none() {
        return Err(PollError::PollNotFound);
    }
    let Json(payload) = payload?;

    let poll = service.cast_vote(&poll_id, payload.option_id).await?;

    Ok((StatusCode::OK, Json(poll)))
}
