use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagType {
    Topic,
    SubTopic,
    Hashtag,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    #[serde(rename = "type")]
    pub tag_type: TagType,
}

impl Tag {
    pub fn new(id: impl Into<String>, tag_type: TagType) -> Self {
        Self {
            id: id.into(),
            tag_type,
        }
    }
}
