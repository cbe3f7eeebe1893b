//! Error types for the conversational assistant.

use crate::types::ExchangeState;

/// Errors from the conversation orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("no quick reply at index {0}")]
    UnknownQuickReply(usize),
    #[error("unknown exchange: {0}")]
    UnknownExchange(uuid::Uuid),
    #[error("invalid exchange transition: {0} -> {1}")]
    InvalidTransition(ExchangeState, ExchangeState),
    #[error("transcript lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Failure of a single call to the remote chat-completion model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelCallError {
    #[error("model credential is not configured")]
    MissingCredential,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("model returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("failed to parse model response: {0}")]
    Malformed(String),
    #[error("No response from model")]
    EmptyReply,
}

impl ModelCallError {
    /// True when the model was never reachable, so the local fallback applies.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ModelCallError::MissingCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "message cannot be empty");
        assert_eq!(
            ChatError::MessageTooLong(2000).to_string(),
            "message exceeds maximum length of 2000 characters"
        );
        assert_eq!(
            ChatError::UnknownQuickReply(7).to_string(),
            "no quick reply at index 7"
        );
        assert_eq!(
            ChatError::InvalidTransition(ExchangeState::Resolved, ExchangeState::Failed)
                .to_string(),
            "invalid exchange transition: resolved -> failed"
        );
    }

    #[test]
    fn test_model_call_error_display() {
        assert_eq!(
            ModelCallError::Http {
                status: 429,
                message: "Rate limit exceeded".to_string()
            }
            .to_string(),
            "model returned 429: Rate limit exceeded"
        );
        assert_eq!(ModelCallError::EmptyReply.to_string(), "No response from model");
        assert!(ModelCallError::Transport("connection refused".to_string())
            .to_string()
            .contains("connection refused"));
    }

    #[test]
    fn test_is_unavailable() {
        assert!(ModelCallError::MissingCredential.is_unavailable());
        assert!(!ModelCallError::EmptyReply.is_unavailable());
        assert!(!ModelCallError::Transport(String::new()).is_unavailable());
    }
}
