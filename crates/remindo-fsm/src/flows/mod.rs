// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flow steps.
//!
//! A step receives the context, the current flow state, and the trigger, and
//! returns a [`Transition`]. Steps never touch the chat or the state store;
//! the engine applies the transition.

pub mod alarm;
pub mod change;
pub mod delete;
pub mod navigation;
pub mod note;
pub mod theme;

use remindo_core::{Reply, StorageError};
use tracing::warn;

use crate::state::FlowState;
use crate::trigger::Trigger;
use crate::views;

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Store the new state and show its prompt.
    Advance(FlowState, Reply),
    /// Malformed input: show a corrective prompt and keep the state as is.
    Reprompt(Reply),
    /// The flow is over (or none was active): clear the state and show `Reply`.
    Finish(Reply),
    /// A recoverable storage failure: apologise, show the main menu, clear
    /// the state.
    Fail { detail: String },
    /// Act on the trigger's own message only (notifications): the active
    /// conversation, if any, is left alone.
    Detached(Option<Reply>),
    /// The trigger means nothing in the current state.
    Ignore,
}

/// Folds recoverable storage errors into [`Transition::Fail`]; everything
/// else propagates to the dispatch safety net.
pub fn settle(result: Result<Transition, StorageError>) -> Result<Transition, StorageError> {
    match result {
        Err(err) if err.is_recoverable() => {
            warn!(error = %err, "flow step failed on a recoverable storage error");
            Ok(Transition::Fail {
                detail: err.to_string(),
            })
        }
        other => other,
    }
}

/// Like [`settle`], but for actions taken from a notification: a
/// recoverable error only apologises and leaves any active flow in place.
pub fn settle_detached(result: Result<Transition, StorageError>) -> Result<Transition, StorageError> {
    match result {
        Err(err) if err.is_recoverable() => {
            warn!(error = %err, "notification action failed on a recoverable storage error");
            Ok(Transition::Detached(Some(views::failure())))
        }
        other => other,
    }
}

/// Same prompt, prefixed with what was wrong with the input.
pub(crate) fn correction(problem: &str, hint: &str) -> Transition {
    Transition::Reprompt(views::prompt(format!("{problem} {hint}")))
}

/// Free text for a text-expecting stage: `Ok(text)` when usable, otherwise
/// the transition to return instead.
pub(crate) fn text_input(trigger: &Trigger, hint: &str) -> Result<String, Transition> {
    match trigger {
        Trigger::Text(text) => crate::input::non_blank(text)
            .ok_or_else(|| correction("Сообщение не должно быть пустым.", hint)),
        Trigger::Photo(_) => Err(correction("Нужен текст, а не картинка.", hint)),
        Trigger::Start | Trigger::Action(_) => Err(Transition::Ignore),
    }
}

/// A required draft field was never filled in.
pub(crate) fn missing(field: &str) -> StorageError {
    StorageError::validation(format!("conversation data has no `{field}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use remindo_core::Action;

    #[test]
    fn recoverable_errors_become_fail() {
        let settled = settle(Err(StorageError::NotFound { entity: "theme" })).unwrap();
        assert!(matches!(settled, Transition::Fail { .. }));

        let settled = settle(Err(StorageError::Duplicate { entity: "user" })).unwrap();
        assert!(matches!(settled, Transition::Fail { .. }));
    }

    #[test]
    fn faults_propagate() {
        let err = settle(Err(StorageError::UnexpectedResponse {
            status: 500,
            detail: "boom".into(),
        }))
        .unwrap_err();
        assert!(!err.is_recoverable());

        let err = settle(Err(StorageError::Auth {
            status: 401,
            detail: "denied".into(),
        }))
        .unwrap_err();
        assert!(matches!(err, StorageError::Auth { .. }));
    }

    #[test]
    fn notification_errors_keep_the_flow() {
        let settled = settle_detached(Err(StorageError::NotFound { entity: "alarm" })).unwrap();
        assert_eq!(settled, Transition::Detached(Some(views::failure())));

        let err = settle_detached(Err(StorageError::UnexpectedResponse {
            status: 502,
            detail: "gateway".into(),
        }))
        .unwrap_err();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn blank_text_is_corrected_not_just_repeated() {
        match text_input(&Trigger::Text(" ".into()), "Введите название") {
            Err(Transition::Reprompt(reply)) => {
                assert_eq!(reply.text, "Сообщение не должно быть пустым. Введите название");
            }
            other => panic!("expected reprompt, got {other:?}"),
        }
    }

    #[test]
    fn text_input_filters_trigger_kinds() {
        assert_eq!(
            text_input(&Trigger::Text("  Work ".into()), "hint").unwrap(),
            "Work"
        );
        assert!(matches!(
            text_input(&Trigger::Text("   ".into()), "hint"),
            Err(Transition::Reprompt(_))
        ));
        assert!(matches!(
            text_input(&Trigger::Photo("f".into()), "hint"),
            Err(Transition::Reprompt(_))
        ));
        assert_eq!(
            text_input(&Trigger::Action(Action::Save), "hint").unwrap_err(),
            Transition::Ignore
        );
    }
}
