//! Structured discussion logging adapters

pub mod jsonl;

pub use jsonl::JsonlDiscussionLogger;
