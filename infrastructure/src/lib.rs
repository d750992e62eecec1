//! Infrastructure layer for roundtable
//!
//! Adapters for the application layer's ports: the HTTP generation gateway,
//! the in-memory session store, the figment-based configuration loader, and
//! the JSONL discussion logger.

pub mod config;
pub mod gateway;
pub mod logging;
pub mod store;

pub use config::{ConfigLoader, FileConfig};
pub use gateway::{GatewayBuildError, HttpTextGateway};
pub use logging::JsonlDiscussionLogger;
pub use store::InMemorySessionStore;
