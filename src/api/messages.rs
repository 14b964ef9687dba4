use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::AppState;
use crate::models::message::ChatMessage;
use crate::models::tag::Tag;
use crate::services::messaging::{
    SendMessageRequest, delete_message, like_message, send_message, unlike_message,
    update_message_tags,
};
use crate::utils::error::AppResult;
use crate::utils::helpers::extract_user_id;

#[derive(Deserialize)]
struct ConversationQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Deserialize)]
struct UpdateTagsRequest {
    tags: Vec<Tag>,
}

async fn send_message_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<ChatMessage>)> {
    let user_id = extract_user_id(&headers)?;
    let message = send_message(&state.messages, &state.safeguarding, req, &user_id).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

async fn get_message_handler(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<String>,
) -> AppResult<Json<ChatMessage>> {
    Ok(Json(state.messages.get_message(&message_id).await?))
}

async fn delete_message_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(message_id): Path<String>,
) -> AppResult<Json<ChatMessage>> {
    let user_id = extract_user_id(&headers)?;
    Ok(Json(
        delete_message(&state.messages, &message_id, &user_id).await?,
    ))
}

async fn update_tags_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(message_id): Path<String>,
    Json(req): Json<UpdateTagsRequest>,
) -> AppResult<Json<ChatMessage>> {
    let user_id = extract_user_id(&headers)?;
    let message = update_message_tags(
        &state.messages,
        &state.safeguarding,
        &message_id,
        req.tags,
        &user_id,
    )
    .await?;
    Ok(Json(message))
}

async fn like_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(message_id): Path<String>,
) -> AppResult<Json<ChatMessage>> {
    let user_id = extract_user_id(&headers)?;
    Ok(Json(
        like_message(&state.messages, &message_id, &user_id).await?,
    ))
}

async fn unlike_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(message_id): Path<String>,
) -> AppResult<Json<ChatMessage>> {
    let user_id = extract_user_id(&headers)?;
    Ok(Json(
        unlike_message(&state.messages, &message_id, &user_id).await?,
    ))
}

async fn conversation_messages_handler(
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<String>,
    Query(query): Query<ConversationQuery>,
) -> AppResult<Json<Vec<ChatMessage>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let offset = query.offset.unwrap_or(0).max(0);

    let messages = state
        .messages
        .get_conversation_messages(&conversation_id, limit, offset)
        .await?;
    Ok(Json(messages))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(send_message_handler))
        .route(
            "/:message_id",
            get(get_message_handler).delete(delete_message_handler),
        )
        .route("/:message_id/tags", put(update_tags_handler))
        .route("/:message_id/like", post(like_handler).delete(unlike_handler))
        .with_state(state)
}

pub fn conversation_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/:conversation_id/messages",
            get(conversation_messages_handler),
        )
        .with_state(state)
}
