//! Generation gateway adapters

pub mod http;

pub use http::{GatewayBuildError, HttpTextGateway};
