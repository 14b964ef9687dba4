use chrono::Utc;

use crate::{
    database::DbPool,
    models::message::{ChatMessage, CreateChatMessage, MessageRow},
    models::tag::Tag,
    utils::error::{AppError, AppResult},
};

/// Access to the `chat_messages` table.
#[derive(Clone)]
pub struct MessageData {
    pool: DbPool,
}

impl MessageData {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: CreateChatMessage, sender_id: &str) -> AppResult<ChatMessage> {
        let message = ChatMessage::new(
            data.conversation_id,
            sender_id.to_string(),
            data.text,
            data.tags,
        );

        sqlx::query(
            "INSERT INTO chat_messages (id, conversation_id, sender_id, text, tags, likes, likes_count, reactions, resolved, deleted, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(&message.conversation_id)
        .bind(&message.sender_id)
        .bind(&message.text)
        .bind(serde_json::to_string(&message.tags)?)
        .bind(serde_json::to_string(&message.likes)?)
        .bind(message.likes_count)
        .bind(serde_json::to_string(&message.reactions)?)
        .bind(message.resolved as i64)
        .bind(message.deleted as i64)
        .bind(&message.created_at)
        .execute(self.pool.as_ref())
        .await?;

        tracing::info!(
            "Created message {} in conversation {}",
            message.id,
            message.conversation_id
        );

        Ok(message)
    }

    /// Fetches a message, including soft-deleted ones.
    pub async fn get_message(&self, message_id: &str) -> AppResult<ChatMessage> {
        self.find(message_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Message not found".to_string()))
    }

    pub async fn get_conversation_messages(
        &self,
        conversation_id: &str,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<ChatMessage>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            "SELECT * FROM chat_messages WHERE conversation_id = ? AND deleted = 0 ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
        )
        .bind(conversation_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(ChatMessage::try_from).collect()
    }

    /// Marks a message as deleted and returns the updated record.
    pub async fn delete(&self, message_id: &str) -> AppResult<ChatMessage> {
        let now = Utc::now().to_rfc3339();

        let result =
            sqlx::query("UPDATE chat_messages SET deleted = 1, updated_at = ? WHERE id = ?")
                .bind(&now)
                .bind(message_id)
                .execute(self.pool.as_ref())
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "The message to delete does not exist".to_string(),
            ));
        }

        tracing::info!("Soft-deleted message {}", message_id);

        self.get_message(message_id).await
    }

    /// Replaces the tag list of a message.
    pub async fn update_tags(&self, message_id: &str, tags: Vec<Tag>) -> AppResult<ChatMessage> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query("UPDATE chat_messages SET tags = ?, updated_at = ? WHERE id = ?")
            .bind(serde_json::to_string(&tags)?)
            .bind(&now)
            .bind(message_id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "The message to update does not exist".to_string(),
            ));
        }

        tracing::info!("Updated {} tags on message {}", tags.len(), message_id);

        self.get_message(message_id).await
    }

    pub async fn like(&self, message_id: &str, user_id: &str) -> AppResult<ChatMessage> {
        self.set_like(message_id, user_id, true).await
    }

    pub async fn unlike(&self, message_id: &str, user_id: &str) -> AppResult<ChatMessage> {
        self.set_like(message_id, user_id, false).await
    }

    async fn set_like(&self, message_id: &str, user_id: &str, liked: bool) -> AppResult<ChatMessage> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, MessageRow>("SELECT * FROM chat_messages WHERE id = ?")
            .bind(message_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Message not found".to_string()))?;

        let mut message = ChatMessage::try_from(row)?;
        let already_liked = message.likes.iter().any(|id| id == user_id);

        if liked == already_liked {
            return Ok(message);
        }

        if liked {
            message.likes.push(user_id.to_string());
        } else {
            message.likes.retain(|id| id != user_id);
        }
        message.likes_count = message.likes.len() as i64;
        message.updated_at = Some(Utc::now().to_rfc3339());

        sqlx::query("UPDATE chat_messages SET likes = ?, likes_count = ?, updated_at = ? WHERE id = ?")
            .bind(serde_json::to_string(&message.likes)?)
            .bind(message.likes_count)
            .bind(&message.updated_at)
            .bind(message_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            "Message {} now has {} likes",
            message_id,
            message.likes_count
        );

        Ok(message)
    }

    async fn find(&self, message_id: &str) -> AppResult<Option<ChatMessage>> {
        let row = sqlx::query_as::<_, MessageRow>("SELECT * FROM chat_messages WHERE id = ?")
            .bind(message_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(ChatMessage::try_from).transpose()
    }
}
