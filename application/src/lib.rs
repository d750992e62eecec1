//! Application layer for roundtable
//!
//! Use cases and ports. The two central pieces live here:
//!
//! - [`throttle::Throttle`] - the bounded-concurrency, paced, retrying
//!   request queue in front of the generation gateway
//! - [`use_cases::DiscussionService`] - the discussion orchestrator, which
//!   issues every generation call through the throttle
//!
//! Ports define what the application needs from the outside world; their
//! adapters live in the infrastructure layer.

pub mod ports;
pub mod throttle;
pub mod use_cases;

pub use ports::discussion_logger::{DiscussionEvent, DiscussionLogger, NoDiscussionLogger};
pub use ports::gateway::{GatewayError, TextGateway};
pub use ports::session_store::{SessionHandle, SessionStore, StoreError};
pub use throttle::{Throttle, ThrottleConfig, ThrottleError};
pub use use_cases::run_discussion::{DiscussionConfig, DiscussionError, DiscussionService};
