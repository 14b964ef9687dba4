pub mod language_detection;
pub mod message_data;
pub mod messaging;
pub mod safeguarding;
pub mod word_lists;
