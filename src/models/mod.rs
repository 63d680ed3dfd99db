pub mod image;
pub mod loaders;
pub mod question;

pub use image::ImageAttachment;
pub use loaders::load_bank;
pub use question::{MatchResult, QuestionBank, QuestionRecord, ResolutionOutcome};
