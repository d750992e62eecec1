//! Configuration loading and file format

pub mod file_config;
pub mod loader;

pub use file_config::{
    ConfigIssue, FileConfig, FileDiscussionConfig, FileGatewayConfig, FileThrottleConfig, Severity,
};
pub use loader::ConfigLoader;
