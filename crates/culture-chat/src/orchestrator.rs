//! Conversation orchestrator: owns the transcript and drives each exchange.
//!
//! Every accepted query appends a final user message and a pending assistant
//! placeholder, then resolves through the remote model (two passes) or the
//! offline synthesizer. Resolution only ever rewrites the placeholder that
//! belongs to its own exchange.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use culture_core::ContextReader;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ChatError, ModelCallError};
use crate::model::{ChatCompletion, ChatTurn, CompletionRequest};
use crate::sanitize::sanitize;
use crate::state_machine::validate_transition;
use crate::synthesizer::ResponseSynthesizer;
use crate::types::{
    Dispatch, ExchangeState, Message, MessageStatus, OrchestratorOptions, PendingTurn,
};

#[derive(Default)]
struct Transcript {
    messages: Vec<Message>,
    exchanges: HashMap<Uuid, ExchangeState>,
}

struct Inner {
    options: OrchestratorOptions,
    model: Option<Arc<dyn ChatCompletion>>,
    synthesizer: ResponseSynthesizer,
    context: ContextReader,
    transcript: Mutex<Transcript>,
}

/// How one exchange ended, before it is written to the transcript.
enum Outcome {
    Answer(String),
    Fallback,
    Failure(ModelCallError),
}

/// Cheap to clone; clones share one transcript.
#[derive(Clone)]
pub struct ConversationOrchestrator {
    inner: Arc<Inner>,
}

impl ConversationOrchestrator {
    /// Create an orchestrator. `model` is `None` when no remote model is set up.
    pub fn new(
        options: OrchestratorOptions,
        model: Option<Arc<dyn ChatCompletion>>,
        context: ContextReader,
    ) -> Self {
        let mut transcript = Transcript::default();
        if let Some(greeting) = &options.greeting {
            transcript.messages.push(Message::assistant(greeting.clone()));
        }

        Self {
            inner: Arc::new(Inner {
                synthesizer: ResponseSynthesizer::new(options.tone),
                options,
                model,
                context,
                transcript: Mutex::new(transcript),
            }),
        }
    }

    pub fn options(&self) -> &OrchestratorOptions {
        &self.inner.options
    }

    pub fn quick_replies(&self) -> &[String] {
        &self.inner.options.quick_replies
    }

    /// Copy of the transcript in insertion order.
    pub fn messages(&self) -> Result<Vec<Message>, ChatError> {
        Ok(self.lock()?.messages.clone())
    }

    pub fn message(&self, id: Uuid) -> Result<Option<Message>, ChatError> {
        Ok(self.lock()?.messages.iter().find(|m| m.id == id).cloned())
    }

    /// State of the exchange owning placeholder `pending_id`.
    pub fn state(&self, pending_id: Uuid) -> Result<Option<ExchangeState>, ChatError> {
        Ok(self.lock()?.exchanges.get(&pending_id).copied())
    }

    /// Validate `text`, append the user message and a pending placeholder.
    ///
    /// Rejected input leaves the transcript untouched.
    pub fn begin(&self, text: &str) -> Result<PendingTurn, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty message");
            return Err(ChatError::EmptyMessage);
        }
        let max = self.inner.options.max_message_length;
        if text.chars().count() > max {
            warn!(limit = max, "Ignoring over-long message");
            return Err(ChatError::MessageTooLong(max));
        }

        let user = Message::user(text);
        let placeholder = Message::placeholder(self.inner.options.placeholder.clone());
        let turn = PendingTurn {
            pending_id: placeholder.id,
            user_message_id: user.id,
            text: text.to_string(),
        };

        let mut transcript = self.lock()?;
        validate_transition(ExchangeState::Idle, ExchangeState::Dispatched)?;
        transcript.messages.push(user);
        transcript.messages.push(placeholder);
        transcript
            .exchanges
            .insert(turn.pending_id, ExchangeState::Dispatched);

        info!(pending_id = %turn.pending_id, "Exchange dispatched");
        Ok(turn)
    }

    /// Produce the answer for `turn` and write it into its placeholder.
    pub async fn resolve(&self, turn: PendingTurn) -> Result<ExchangeState, ChatError> {
        match self.state(turn.pending_id)? {
            Some(ExchangeState::Dispatched) => {}
            Some(state) => {
                return Err(ChatError::InvalidTransition(state, ExchangeState::Resolved));
            }
            None => return Err(ChatError::UnknownExchange(turn.pending_id)),
        }

        let (content, state) = match self.run_exchange(&turn.text).await {
            Outcome::Answer(answer) => (answer, ExchangeState::Resolved),
            Outcome::Fallback => {
                let context = self.inner.context.snapshot();
                (
                    self.inner.synthesizer.synthesize(&turn.text, &context),
                    ExchangeState::Resolved,
                )
            }
            Outcome::Failure(e) => {
                warn!(pending_id = %turn.pending_id, "Model call failed: {}", e);
                (format!("Error: {}", e), ExchangeState::Failed)
            }
        };

        self.finish(turn.pending_id, content, state)
    }

    /// `begin` then resolve on the Tokio runtime.
    ///
    /// Must be called from within a runtime. The placeholder exists before
    /// this returns.
    pub fn submit(&self, text: &str) -> Result<Dispatch, ChatError> {
        let turn = self.begin(text)?;
        let pending_id = turn.pending_id;
        let this = self.clone();
        let handle = tokio::spawn(async move { this.resolve(turn).await });
        Ok(Dispatch { pending_id, handle })
    }

    /// Submit the canned query at `index`.
    pub fn quick_reply(&self, index: usize) -> Result<Dispatch, ChatError> {
        let text = self
            .inner
            .options
            .quick_replies
            .get(index)
            .cloned()
            .ok_or(ChatError::UnknownQuickReply(index))?;
        self.submit(&text)
    }

    async fn run_exchange(&self, text: &str) -> Outcome {
        let model = match &self.inner.model {
            Some(model) if model.is_available() => model,
            _ => {
                info!("No model credential, answering locally");
                return Outcome::Fallback;
            }
        };
        let options = &self.inner.options;

        let mut messages = Vec::with_capacity(4);
        if let Some(directive) = &options.system_directive {
            messages.push(ChatTurn::system(directive.clone()));
        }
        messages.push(ChatTurn::user(text));

        // Pass 1
        let first = match model
            .complete(&CompletionRequest {
                messages: messages.clone(),
                reasoning: true,
            })
            .await
        {
            Ok(message) => message,
            Err(e) if e.is_unavailable() => {
                info!("Model unavailable, answering locally");
                return Outcome::Fallback;
            }
            Err(e) => return Outcome::Failure(e),
        };

        let Some(first_answer) = first.text().map(|t| self.clean(t)).filter(|t| !t.is_empty())
        else {
            return Outcome::Failure(ModelCallError::EmptyReply);
        };

        // Pass 2
        messages.push(ChatTurn::assistant(
            first_answer.clone(),
            first.reasoning_details.clone(),
        ));
        messages.push(ChatTurn::user(options.confirmation_prompt.clone()));

        match model
            .complete(&CompletionRequest {
                messages,
                reasoning: false,
            })
            .await
        {
            Ok(second) => match second.text().map(|t| self.clean(t)).filter(|t| !t.is_empty()) {
                Some(answer) => Outcome::Answer(answer),
                None => {
                    debug!("Verification pass returned nothing, keeping first answer");
                    Outcome::Answer(first_answer)
                }
            },
            Err(e) => {
                warn!("Verification pass failed, keeping first answer: {}", e);
                Outcome::Answer(first_answer)
            }
        }
    }

    fn clean(&self, text: &str) -> String {
        if self.inner.options.sanitize {
            sanitize(text)
        } else {
            text.to_string()
        }
    }

    fn finish(
        &self,
        pending_id: Uuid,
        content: String,
        state: ExchangeState,
    ) -> Result<ExchangeState, ChatError> {
        let mut transcript = self.lock()?;
        let current = transcript
            .exchanges
            .get(&pending_id)
            .copied()
            .ok_or(ChatError::UnknownExchange(pending_id))?;
        if let Err(e) = validate_transition(current, state) {
            warn!(%pending_id, "Discarding resolution: {}", e);
            return Err(e);
        }

        let message = transcript
            .messages
            .iter_mut()
            .find(|m| m.id == pending_id && m.is_pending())
            .ok_or(ChatError::UnknownExchange(pending_id))?;
        message.content = content;
        message.status = MessageStatus::Final;
        transcript.exchanges.insert(pending_id, state);

        info!(%pending_id, %state, "Exchange finished");
        Ok(state)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Transcript>, ChatError> {
        self.inner
            .transcript
            .lock()
            .map_err(|e| ChatError::LockPoisoned(e.to_string()))
    }
}
