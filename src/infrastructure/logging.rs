use std::sync::{Arc, Mutex};

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    reload,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::config::LoggingConfig;
use crate::domain::DomainError;

/// Handle to the installed subscriber, created once at startup and shared
/// through application state. Allows changing the filter at runtime.
#[derive(Clone)]
pub struct LoggingHandle {
    reload: Option<reload::Handle<EnvFilter, Registry>>,
    level: Arc<Mutex<String>>,
}

impl std::fmt::Debug for LoggingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingHandle")
            .field("level", &self.level())
            .field("attached", &self.reload.is_some())
            .finish()
    }
}

impl LoggingHandle {
    /// A handle not bound to any subscriber; level changes are only recorded
    pub fn detached(level: impl Into<String>) -> Self {
        Self {
            reload: None,
            level: Arc::new(Mutex::new(level.into())),
        }
    }

    pub fn level(&self) -> String {
        match self.level.lock() {
            Ok(level) => level.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the active filter directive, e.g. `debug` or `nexus_mentorship=trace`
    pub fn set_level(&self, directive: &str) -> Result<(), DomainError> {
        let filter = EnvFilter::try_new(directive).map_err(|e| {
            DomainError::validation(format!("Invalid log filter '{}': {}", directive, e))
        })?;

        if let Some(handle) = &self.reload {
            handle
                .reload(filter)
                .map_err(|e| DomainError::internal(format!("Failed to reload log filter: {}", e)))?;
        }

        match self.level.lock() {
            Ok(mut level) => *level = directive.to_string(),
            Err(poisoned) => *poisoned.into_inner() = directive.to_string(),
        }

        tracing::info!(level = %directive, "Log level changed");
        Ok(())
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the config.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingHandle, DomainError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));
    let (filter_layer, handle) = reload::Layer::new(filter);
    let registry = tracing_subscriber::registry().with(filter_layer);

    let installed = match config.format {
        crate::config::LogFormat::Json => registry
            .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
            .try_init(),
        crate::config::LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
    };

    installed.map_err(|e| {
        DomainError::configuration(format!("Failed to install log subscriber: {}", e))
    })?;

    tracing::info!("Logging initialized with level: {}", config.level);

    Ok(LoggingHandle {
        reload: Some(handle),
        level: Arc::new(Mutex::new(config.level.clone())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_handle_records_level() {
        let handle = LoggingHandle::detached("info");
        handle.set_level("debug").unwrap();
        assert_eq!(handle.level(), "debug");
    }

    #[test]
    fn test_invalid_directive_rejected() {
        let handle = LoggingHandle::detached("info");
        let result = handle.set_level("nexus=notalevel");
        assert!(matches!(result, Err(DomainError::Validation { .. })));
        assert_eq!(handle.level(), "info");
    }

    #[test]
    fn test_clones_share_level() {
        let handle = LoggingHandle::detached("info");
        let clone = handle.clone();
        clone.set_level("warn").unwrap();
        assert_eq!(handle.level(), "warn");
    }
}
