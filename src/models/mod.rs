pub mod message;
pub mod tag;
