//! Application configuration

mod app_config;

pub use app_config::{ApiConfig, AppConfig, LogFormat, LoggingConfig, SessionConfig};
