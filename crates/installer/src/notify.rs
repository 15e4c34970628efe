//! Completion notification payloads.

use crate::types::{Notification, NotifyAction, Outcome};

/// Build the completion notice for a terminal outcome.
///
/// Failures are rendered as clearly as successes; only a success carries the
/// open-destination action.
pub fn completion_notice(outcome: &Outcome) -> Notification {
    match outcome {
        Outcome::Success { destination } => Notification {
            title: "Install complete".to_owned(),
            body: format!("Extracted to {}", destination.display()),
            destination: Some(destination.clone()),
            action: Some(NotifyAction::OpenDestination),
        },
        Outcome::Cancelled => Notification {
            title: "Install cancelled".to_owned(),
            body: "The existing destination was left untouched".to_owned(),
            destination: None,
            action: None,
        },
        Outcome::Failed { reason } => Notification {
            title: "Install failed".to_owned(),
            body: reason.clone(),
            destination: None,
            action: None,
        },
    }
}
