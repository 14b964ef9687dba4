use crate::models::tag::Tag;
use crate::utils::error::{AppError, AppResult};

pub const MAX_MESSAGE_LENGTH: usize = 4000;
pub const MAX_TAGS_PER_MESSAGE: usize = 10;

pub fn validate_message_content(content: &str) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::Validation(
            "Message content cannot be empty".to_string(),
        ));
    }

    validate_message_length(content)
}

pub fn validate_message_length(content: &str) -> AppResult<()> {
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(AppError::Validation(format!(
            "Message content must be at most {} characters long",
            MAX_MESSAGE_LENGTH
        )));
    }

    Ok(())
}

pub fn validate_tags(tags: &[Tag]) -> AppResult<()> {
    if tags.len() > MAX_TAGS_PER_MESSAGE {
        return Err(AppError::Validation(format!(
            "A message can have at most {} tags",
            MAX_TAGS_PER_MESSAGE
        )));
    }

    Ok(())
}

pub fn validate_identifier(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", field)));
    }

    if value.len() > 64 {
        return Err(AppError::Validation(format!(
            "{} must be at most 64 characters long",
            field
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tag::TagType;

    #[test]
    fn test_message_content() {
        assert!(validate_message_content("hello").is_ok());
        assert!(validate_message_content("   ").is_err());
        assert!(validate_message_content(&"a".repeat(MAX_MESSAGE_LENGTH)).is_ok());
        assert!(validate_message_content(&"a".repeat(MAX_MESSAGE_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_message_length_allows_blank() {
        assert!(validate_message_length("").is_ok());
        assert!(validate_message_length("   ").is_ok());
        assert!(validate_message_length(&"a".repeat(MAX_MESSAGE_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_message_length_counts_characters() {
        assert!(validate_message_content(&"🤬".repeat(MAX_MESSAGE_LENGTH)).is_ok());
    }

    #[test]
    fn test_tag_count() {
        let tags: Vec<Tag> = (0..=MAX_TAGS_PER_MESSAGE)
            .map(|i| Tag::new(format!("tag{i}"), TagType::Hashtag))
            .collect();
        assert!(validate_tags(&tags[..MAX_TAGS_PER_MESSAGE]).is_ok());
        assert!(validate_tags(&tags).is_err());
    }

    #[test]
    fn test_identifier() {
        assert!(validate_identifier("conversation-1", "Conversation id").is_ok());
        assert!(validate_identifier("", "Conversation id").is_err());
        assert!(validate_identifier(&"x".repeat(65), "Conversation id").is_err());
    }
}
