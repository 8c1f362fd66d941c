//! # Error Types Module
//!
//! Configuration problems are the only failures with their own type. Handler,
//! outbox and session store failures travel as `anyhow::Error` and end up in
//! the state machine's top-level recovery.

/// Errors raised while reading configuration from the environment
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `BOT_TOKEN` is absent or blank
    #[error("BOT_TOKEN missing. Get one from BotFather and put it in the environment or .env")]
    MissingToken,
    /// A variable is present but cannot be parsed
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formatting() {
        assert!(ConfigError::MissingToken.to_string().starts_with("BOT_TOKEN missing"));

        let invalid = ConfigError::InvalidValue {
            name: "SESSION_TTL_SECS",
            value: "soon".to_string(),
        };
        assert_eq!(invalid.to_string(), "invalid value for SESSION_TTL_SECS: \"soon\"");
    }
}
