/// Main error type for the event service
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Internal error: {component}: {reason}")]
    Internal { component: String, reason: String },

    #[error("Server start failed: {0}")]
    ServerStartFailed(String),
}

/// Convenience type alias
pub type EventResult<T> = std::result::Result<T, EventError>;

impl From<tokio::task::JoinError> for EventError {
    fn from(error: tokio::task::JoinError) -> Self {
        let reason = if error.is_cancelled() {
            "task cancelled".to_string()
        } else if error.is_panic() {
            "task panicked".to_string()
        } else {
            error.to_string()
        };

        Self::Internal {
            component: "task".to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_to_string_contains_context() {
        let err = EventError::InvalidConfiguration {
            field: "max_drain_wait".into(),
            reason: "not a number".into(),
        };
        let message = err.to_string();
        assert!(message.contains("max_drain_wait"));
        assert!(message.contains("not a number"));
    }
}
