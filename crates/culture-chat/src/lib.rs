//! Conversational assistant for CultureGuide.
//!
//! Owns the transcript, drives the two-pass exchange against a remote
//! chat-completion model, and falls back to canned, context-aware answers
//! when no model is configured.

pub mod error;
pub mod intent;
pub mod model;
pub mod orchestrator;
pub mod sanitize;
pub mod state_machine;
pub mod synthesizer;
pub mod types;

pub use error::{ChatError, ModelCallError};
pub use intent::{Intent, IntentClassifier};
pub use model::{
    ChatCompletion, ChatTurn, CompletionMessage, CompletionRequest, OpenRouterClient, TurnRole,
};
pub use orchestrator::ConversationOrchestrator;
pub use sanitize::sanitize;
pub use synthesizer::ResponseSynthesizer;
pub use types::{
    Dispatch, ExchangeState, Message, MessageStatus, OrchestratorOptions, PendingTurn, Role, Tone,
};
