//! Prompt construction for discussion generation calls

pub mod template;

pub use template::PromptTemplate;
