//! Transcript and exchange types.

use std::fmt;

use chrono::{DateTime, Utc};
use culture_core::config::ChatConfig;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::ChatError;

// =============================================================================
// Messages
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Final,
    /// Reserved placeholder awaiting resolution of its exchange.
    Pending,
}

/// One transcript entry. Only a pending entry's content is ever rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>, status: MessageStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            status,
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, MessageStatus::Final)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, MessageStatus::Final)
    }

    pub fn placeholder(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, MessageStatus::Pending)
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }
}

// =============================================================================
// Exchange lifecycle
// =============================================================================

/// Lifecycle of one submitted query: `Idle -> Dispatched -> Resolved | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeState {
    Idle,
    Dispatched,
    Resolved,
    Failed,
}

impl ExchangeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExchangeState::Resolved | ExchangeState::Failed)
    }
}

impl fmt::Display for ExchangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExchangeState::Idle => "idle",
            ExchangeState::Dispatched => "dispatched",
            ExchangeState::Resolved => "resolved",
            ExchangeState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A dispatched exchange whose placeholder is waiting to be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    /// Id of the reserved assistant placeholder.
    pub pending_id: Uuid,
    pub user_message_id: Uuid,
    /// The trimmed user text.
    pub text: String,
}

/// Handle on an exchange spawned by `submit`.
#[derive(Debug)]
pub struct Dispatch {
    pub pending_id: Uuid,
    pub handle: JoinHandle<Result<ExchangeState, ChatError>>,
}

// =============================================================================
// Orchestrator options
// =============================================================================

/// Voice of the canned fallback answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Neutral,
    Enthusiastic,
}

const GUIDE_GREETING: &str = "Hello! I'm your AI tourist guide. I can help you discover cultural \
activities, local experiences, and provide navigation assistance. What would you like to know \
about your destination?";

const COMPANION_GREETING: &str = "Hello! I'm your AI tourist guide. I can help you discover \
amazing cultural activities and fun experiences at specific locations. What area are you \
interested in exploring?";

const COMPANION_DIRECTIVE: &str = "You are an enthusiastic travel guide assistant focused \
exclusively on locations and activities. Provide information only about specific places \
mentioned and describe how amazing and fun the activities are in those areas.

Write in clear, well-structured paragraphs using plain text. Do not use any asterisks, bullet \
points, markdown, or special formatting. Use complete sentences with proper punctuation.

Keep responses concise, upbeat, and focused on the excitement of experiences in the locations \
discussed. Avoid general travel advice or non-location topics.";

const GUIDE_CONFIRMATION: &str = "Are you sure? Think carefully.";

const COMPANION_CONFIRMATION: &str = "Are you sure? Think carefully about the specific locations \
and how fun the activities are. Use plain text only with no formatting.";

/// Construction-time parameters of a conversation surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorOptions {
    /// Fixed system message sent ahead of the user's text on both passes.
    pub system_directive: Option<String>,
    /// Strip markup from model replies.
    pub sanitize: bool,
    /// Second-pass verification prompt.
    pub confirmation_prompt: String,
    /// First assistant message of the transcript.
    pub greeting: Option<String>,
    pub quick_replies: Vec<String>,
    pub tone: Tone,
    pub placeholder: String,
    pub max_message_length: usize,
}

impl OrchestratorOptions {
    /// Neutral guide: no directive, raw model output.
    pub fn guide() -> Self {
        let chat = ChatConfig::default();
        Self {
            system_directive: None,
            sanitize: false,
            confirmation_prompt: GUIDE_CONFIRMATION.to_string(),
            greeting: Some(GUIDE_GREETING.to_string()),
            quick_replies: vec![
                "What cultural activities are near me?".to_string(),
                "Are there any festivals this month?".to_string(),
                "Best traditional restaurants near me".to_string(),
                "Where am I and what can I do here?".to_string(),
            ],
            tone: Tone::Neutral,
            placeholder: chat.placeholder,
            max_message_length: chat.max_message_length,
        }
    }

    /// Enthusiastic companion: location-focused directive, plain-text output.
    pub fn companion() -> Self {
        let chat = ChatConfig::default();
        Self {
            system_directive: Some(COMPANION_DIRECTIVE.to_string()),
            sanitize: true,
            confirmation_prompt: COMPANION_CONFIRMATION.to_string(),
            greeting: Some(COMPANION_GREETING.to_string()),
            quick_replies: vec![
                "What amazing things near me?".to_string(),
                "Most fun location around?".to_string(),
                "Top activity spots?".to_string(),
                "Exciting cultural places?".to_string(),
            ],
            tone: Tone::Enthusiastic,
            placeholder: chat.placeholder,
            max_message_length: chat.max_message_length,
        }
    }

    /// Apply the configured placeholder and length limit.
    pub fn with_chat_config(mut self, chat: &ChatConfig) -> Self {
        self.placeholder = chat.placeholder.clone();
        self.max_message_length = chat.max_message_length;
        self
    }
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self::guide()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user = Message::user("hi");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.status, MessageStatus::Final);

        let pending = Message::placeholder("Thinking…");
        assert_eq!(pending.role, Role::Assistant);
        assert!(pending.is_pending());
        assert_ne!(user.id, pending.id);
    }

    #[test]
    fn test_message_serde() {
        let json = serde_json::to_value(Message::assistant("ok")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["status"], "final");
    }

    #[test]
    fn test_exchange_state_terminal() {
        assert!(!ExchangeState::Idle.is_terminal());
        assert!(!ExchangeState::Dispatched.is_terminal());
        assert!(ExchangeState::Resolved.is_terminal());
        assert!(ExchangeState::Failed.is_terminal());
    }

    #[test]
    fn test_guide_preset() {
        let opts = OrchestratorOptions::guide();
        assert!(opts.system_directive.is_none());
        assert!(!opts.sanitize);
        assert_eq!(opts.tone, Tone::Neutral);
        assert_eq!(opts.confirmation_prompt, "Are you sure? Think carefully.");
        assert_eq!(opts.quick_replies.len(), 4);
        assert_eq!(opts.placeholder, "Thinking…");
        assert_eq!(opts.max_message_length, 2000);
    }

    #[test]
    fn test_companion_preset() {
        let opts = OrchestratorOptions::companion();
        assert!(opts
            .system_directive
            .as_deref()
            .unwrap()
            .starts_with("You are an enthusiastic travel guide"));
        assert!(opts.sanitize);
        assert_eq!(opts.tone, Tone::Enthusiastic);
        assert!(opts.confirmation_prompt.contains("plain text only"));
        assert_eq!(opts.quick_replies[1], "Most fun location around?");
    }

    #[test]
    fn test_with_chat_config() {
        let chat = ChatConfig {
            max_message_length: 10,
            placeholder: "...".to_string(),
        };
        let opts = OrchestratorOptions::companion().with_chat_config(&chat);
        assert_eq!(opts.max_message_length, 10);
        assert_eq!(opts.placeholder, "...");
        assert!(opts.sanitize);
    }
}
