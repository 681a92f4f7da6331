//! HTTP access to the admin backend

mod gateway;

pub use gateway::ApiGateway;
