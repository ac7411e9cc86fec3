//! HTTP client for the gateway API

mod http;

pub use http::{GatewayClient, DEFAULT_GATEWAY_URL};
