//! Infrastructure layer - Logging, durable session storage and the HTTP gateway

pub mod http;
pub mod logging;
pub mod session;
