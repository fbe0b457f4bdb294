//! Error types.
//!
//! The matching loop itself never fails: every branch is an ordinary state
//! transition. Errors only arise at the edges, when an order is refused at
//! intake, the processing thread is gone, or configuration cannot be read.

use thiserror::Error;

/// Errors surfaced by the engine's public API.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Order refused at the intake boundary
    #[error("order {order_id} rejected: {reason}")]
    InvalidOrder {
        order_id: String,
        reason: &'static str,
    },

    /// The order already carries an arrival sequence
    #[error("order {0} was already submitted")]
    AlreadySubmitted(String),

    /// The processing thread is no longer accepting orders
    #[error("matching thread is not running")]
    Disconnected,

    /// The processing thread panicked
    #[error("matching thread panicked")]
    WorkerPanicked,

    /// Failed to spawn the processing thread
    #[error("failed to spawn matching thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// SSZ encoding of a transaction record failed
    #[error("failed to encode transaction record: {0}")]
    Encoding(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::InvalidOrder {
            order_id: "7".to_string(),
            reason: "shares must be positive",
        };
        assert_eq!(err.to_string(), "order 7 rejected: shares must be positive");

        let err: EngineError = ConfigError::Invalid("thread_name is empty".into()).into();
        assert_eq!(err.to_string(), "invalid config: thread_name is empty");
    }
}
