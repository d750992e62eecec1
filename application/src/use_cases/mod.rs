//! Application use cases

pub mod run_discussion;

pub use run_discussion::{DiscussionConfig, DiscussionError, DiscussionService};
