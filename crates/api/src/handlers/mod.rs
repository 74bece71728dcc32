pub mod images;
pub mod prompts;
