use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::tag::Tag;
use crate::utils::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub sender_id: String,
    pub reaction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub text: String,
    pub tags: Vec<Tag>,
    pub likes: Vec<String>,
    pub likes_count: i64,
    pub reactions: Vec<Reaction>,
    pub resolved: bool,
    pub deleted: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl ChatMessage {
    pub fn new(conversation_id: String, sender_id: String, text: String, tags: Vec<Tag>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            conversation_id,
            sender_id,
            text,
            tags,
            likes: Vec::new(),
            likes_count: 0,
            reactions: Vec::new(),
            resolved: false,
            deleted: false,
            created_at: Utc::now().to_rfc3339(),
            updated_at: None,
        }
    }
}

/// `chat_messages` row. List columns hold JSON text.
#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub text: String,
    pub tags: String,
    pub likes: String,
    pub likes_count: i64,
    pub reactions: String,
    pub resolved: i64,
    pub deleted: i64,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl TryFrom<MessageRow> for ChatMessage {
    type Error = AppError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            conversation_id: row.conversation_id,
            sender_id: row.sender_id,
            text: row.text,
            tags: serde_json::from_str(&row.tags)?,
            likes: serde_json::from_str(&row.likes)?,
            likes_count: row.likes_count,
            reactions: serde_json::from_str(&row.reactions)?,
            resolved: row.resolved != 0,
            deleted: row.deleted != 0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatMessage {
    pub conversation_id: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}
