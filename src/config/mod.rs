//! Layered configuration: `config/default`, `config/local`, then `APP__*` env vars

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DashboardConfig, DatabaseConfig, LogFormat, LoggingConfig,
    MetricsConfig, RegistrationConfig, RuntimeConfig, ServerConfig, StorageBackend,
    StorageConfig,
};
