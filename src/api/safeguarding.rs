use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::AppState;
use crate::utils::error::AppResult;
use crate::utils::validation::validate_message_length;

#[derive(Debug, Serialize, Deserialize)]
pub struct CleanTextPayload {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CleanTagPayload {
    pub tag_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CleanTagResponse {
    pub tag_id: Option<String>,
}

async fn clean_text(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CleanTextPayload>,
) -> AppResult<Json<CleanTextPayload>> {
    validate_message_length(&payload.text)?;
    Ok(Json(CleanTextPayload {
        text: state.safeguarding.clean(&payload.text),
    }))
}

async fn clean_tag(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CleanTagPayload>,
) -> Json<CleanTagResponse> {
    Json(CleanTagResponse {
        tag_id: state.safeguarding.clean_tag_id(&payload.tag_id),
    })
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/clean", post(clean_text))
        .route("/clean-tag", post(clean_tag))
        .with_state(state)
}
