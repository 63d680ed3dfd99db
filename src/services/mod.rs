pub mod matcher;
pub mod vision_service;

pub use matcher::{best_match, token_sort_ratio};
pub use vision_service::{LlmVisionService, VisionClient};
