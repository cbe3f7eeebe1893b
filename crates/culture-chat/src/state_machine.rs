//! Exchange state machine with validated transitions.
//!
//! Idle -> Dispatched -> Resolved/Failed

use crate::error::ChatError;
use crate::types::ExchangeState;

/// Validate that an exchange transition is allowed.
///
/// Valid transitions:
/// - Idle -> Dispatched
/// - Dispatched -> Resolved
/// - Dispatched -> Failed
pub fn validate_transition(from: ExchangeState, to: ExchangeState) -> Result<(), ChatError> {
    let valid = matches!(
        (from, to),
        (ExchangeState::Idle, ExchangeState::Dispatched)
            | (ExchangeState::Dispatched, ExchangeState::Resolved)
            | (ExchangeState::Dispatched, ExchangeState::Failed)
    );

    if valid {
        Ok(())
    } else {
        Err(ChatError::InvalidTransition(from, to))
    }
}
