pub mod common;
pub mod ingredients;
pub mod kitchen;
pub mod llm;
pub mod recipe;
pub mod request;
pub mod storage;
