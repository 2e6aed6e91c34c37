//! User-facing failures of shift actions.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::api::ApiError;
use crate::reconcile::Action;
use crate::store::StoreError;

pub const NETWORK_MESSAGE: &str = "Unable to connect to server";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";
pub const GEOFENCE_MESSAGE: &str = "You must be at the shift location to check in.";

static LOCATION_REJECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)geofence|location|radius").expect("valid location regex"));

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Unable to connect to server")]
    Network,
    #[error("Session expired. Please log in again.")]
    SessionExpired,
    #[error("You must be at the shift location to check in.")]
    OutsideGeofence,
    /// Backend rejection, shown verbatim.
    #[error("{0}")]
    Rejected(String),
    /// Refused locally because the shift does not offer the action.
    #[error("{0}")]
    NotAllowed(String),
    #[error("Shift {0} is not in the current list; refresh and try again")]
    UnknownShift(i64),
    #[error("Please log in first")]
    NotLoggedIn,
    #[error("local storage failure: {0}")]
    Store(#[from] StoreError),
}

/// Generic message used when the backend gave no error text.
pub fn fallback_message(action: Action) -> &'static str {
    match action {
        Action::Register => "Failed to register for shift",
        Action::CheckIn => "Failed to check in",
        Action::CheckOut => "Failed to check out",
    }
}

/// Map a transport/backend failure of `action` to what the user sees.
/// `fallback` is used when the backend supplied no message.
pub fn describe_failure(action: Option<Action>, err: &ApiError, fallback: &str) -> ActionError {
    match err {
        ApiError::Network(_) => ActionError::Network,
        ApiError::Unauthorized => ActionError::SessionExpired,
        _ => {
            let message = err.backend_message();
            if action == Some(Action::CheckIn)
                && message.is_some_and(|m| LOCATION_REJECTION.is_match(m))
            {
                return ActionError::OutsideGeofence;
            }
            ActionError::Rejected(message.unwrap_or(fallback).to_string())
        }
    }
}
