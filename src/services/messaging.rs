use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    models::message::{ChatMessage, CreateChatMessage},
    models::tag::Tag,
    services::message_data::MessageData,
    services::safeguarding::SafeguardingService,
    utils::error::{AppError, AppResult},
    utils::validation::{validate_identifier, validate_message_content, validate_tags},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub conversation_id: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Runs every tag id through the tag sanitizer, dropping the ones that come
/// back empty and later duplicates of the same id.
pub fn sanitize_tags(safeguarding: &SafeguardingService, tags: Vec<Tag>) -> Vec<Tag> {
    let mut seen = HashSet::new();

    tags.into_iter()
        .filter_map(|tag| {
            let id = safeguarding.clean_tag_id(&tag.id)?;
            Some(Tag::new(id, tag.tag_type))
        })
        .filter(|tag| seen.insert(tag.id.clone()))
        .collect()
}

pub async fn send_message(
    data: &MessageData,
    safeguarding: &SafeguardingService,
    request: SendMessageRequest,
    sender_id: &str,
) -> AppResult<ChatMessage> {
    validate_identifier(&request.conversation_id, "Conversation id")?;
    validate_message_content(&request.text)?;
    validate_tags(&request.tags)?;

    let text = safeguarding.clean(&request.text);
    if text != request.text {
        tracing::debug!("Censored message from {}", sender_id);
    }

    let tags = sanitize_tags(safeguarding, request.tags);

    data.create(
        CreateChatMessage {
            conversation_id: request.conversation_id,
            text,
            tags,
        },
        sender_id,
    )
    .await
}

async fn owned_message(
    data: &MessageData,
    message_id: &str,
    requester_id: &str,
    action: &str,
) -> AppResult<ChatMessage> {
    let message = data.get_message(message_id).await?;

    if message.sender_id != requester_id {
        return Err(AppError::Forbidden(format!(
            "You can only {} your own messages",
            action
        )));
    }

    Ok(message)
}

pub async fn delete_message(
    data: &MessageData,
    message_id: &str,
    requester_id: &str,
) -> AppResult<ChatMessage> {
    let message = owned_message(data, message_id, requester_id, "delete").await?;

    if message.deleted {
        return Ok(message);
    }

    data.delete(message_id).await
}

pub async fn update_message_tags(
    data: &MessageData,
    safeguarding: &SafeguardingService,
    message_id: &str,
    tags: Vec<Tag>,
    requester_id: &str,
) -> AppResult<ChatMessage> {
    validate_tags(&tags)?;

    let message = owned_message(data, message_id, requester_id, "retag").await?;

    if message.deleted {
        return Err(AppError::BadRequest(
            "Cannot update tags of a deleted message".to_string(),
        ));
    }

    data.update_tags(message_id, sanitize_tags(safeguarding, tags))
        .await
}

pub async fn like_message(
    data: &MessageData,
    message_id: &str,
    user_id: &str,
) -> AppResult<ChatMessage> {
    let message = data.get_message(message_id).await?;

    if message.deleted {
        return Err(AppError::BadRequest(
            "Cannot like a deleted message".to_string(),
        ));
    }

    data.like(message_id, user_id).await
}

pub async fn unlike_message(
    data: &MessageData,
    message_id: &str,
    user_id: &str,
) -> AppResult<ChatMessage> {
    data.unlike(message_id, user_id).await
}
