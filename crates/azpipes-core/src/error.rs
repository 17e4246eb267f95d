//! Error types for azpipes.
//!
//! [`Error`] is the closed set of failure kinds surfaced to callers.
//! [`RemoteFailure`] is whatever a [`crate::api::PipelinesApi`] implementation
//! reports; [`classify`] turns the latter into the former exactly once per
//! operation.

use derive_more::Display;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{0}")]
    Generic(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    ResourceNotFound(String),
}

impl Error {
    /// The human-readable message carried by every variant.
    pub fn message(&self) -> &str {
        match self {
            Error::Generic(msg) | Error::Authentication(msg) | Error::ResourceNotFound(msg) => msg,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Result of a call on the remote API, before classification.
pub type RemoteResult<T> = std::result::Result<T, RemoteFailure>;

/// A failure reported by the remote API collaborator, before classification.
#[derive(Debug, Clone, Error)]
pub enum RemoteFailure {
    /// Already one of the domain errors; passed through untouched.
    #[error(transparent)]
    Classified(#[from] Error),

    /// An error value exposing a message (transport errors, HTTP error bodies).
    #[error("{0}")]
    Message(String),

    /// A failure without a message. Only its rendering is available.
    #[error("{0}")]
    Opaque(String),
}

impl RemoteFailure {
    pub fn message(message: impl std::fmt::Display) -> Self {
        RemoteFailure::Message(message.to_string())
    }

    pub fn opaque(value: impl std::fmt::Debug) -> Self {
        RemoteFailure::Opaque(format!("{value:?}"))
    }
}

/// The operation a remote call was made for. Used to prefix error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Operation {
    #[display("list pipelines")]
    ListPipelines,
    #[display("trigger pipeline")]
    TriggerPipeline,
}

impl Operation {
    fn not_found_subject(self) -> &'static str {
        match self {
            Operation::ListPipelines => "Project or resource",
            Operation::TriggerPipeline => "Pipeline or project",
        }
    }
}

// Matched case-sensitively, in this order. Authentication wins ties.
const AUTHENTICATION_SIGNALS: &[&str] = &["Authentication", "Unauthorized", "401"];
const NOT_FOUND_SIGNALS: &[&str] = &["not found", "does not exist", "404"];

/// Classify a remote failure into a domain error.
///
/// Domain errors pass through unchanged, so classifying twice is a no-op.
/// Messages are sniffed for authentication and then not-found signals; any
/// other failure becomes [`Error::Generic`] prefixed with the operation.
pub fn classify(failure: RemoteFailure, operation: Operation) -> Error {
    match failure {
        RemoteFailure::Classified(err) => err,
        RemoteFailure::Message(message) => {
            if contains_any(&message, AUTHENTICATION_SIGNALS) {
                Error::Authentication(format!("Failed to authenticate: {message}"))
            } else if contains_any(&message, NOT_FOUND_SIGNALS) {
                Error::ResourceNotFound(format!(
                    "{} not found: {message}",
                    operation.not_found_subject()
                ))
            } else {
                Error::Generic(format!("Failed to {operation}: {message}"))
            }
        }
        RemoteFailure::Opaque(rendering) => {
            Error::Generic(format!("Failed to {operation}: {rendering}"))
        }
    }
}

fn contains_any(message: &str, signals: &[&str]) -> bool {
    signals.iter().any(|signal| message.contains(signal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_passes_through() {
        let original = Error::ResourceNotFound("Pipeline or project not found: gone".to_string());

        let classified = classify(
            RemoteFailure::from(original.clone()),
            Operation::ListPipelines,
        );
        assert_eq!(classified, original);

        // A second round changes nothing either.
        let again = classify(RemoteFailure::from(classified), Operation::TriggerPipeline);
        assert_eq!(again, original);
    }

    #[test]
    fn test_generic_error_is_not_rewrapped() {
        let original = Error::Generic("Failed to list pipelines: 401 somewhere".to_string());
        let classified = classify(original.clone().into(), Operation::ListPipelines);
        assert_eq!(classified, original);
    }

    #[test]
    fn test_authentication_signals() {
        for message in [
            "Authentication required",
            "401 Unauthorized",
            "request returned 401",
            "Unauthorized access to project",
        ] {
            let err = classify(RemoteFailure::message(message), Operation::ListPipelines);
            assert_eq!(
                err,
                Error::Authentication(format!("Failed to authenticate: {message}"))
            );
        }
    }

    #[test]
    fn test_not_found_signals() {
        let err = classify(
            RemoteFailure::message("Project Fabrikam does not exist"),
            Operation::ListPipelines,
        );
        assert_eq!(
            err,
            Error::ResourceNotFound(
                "Project or resource not found: Project Fabrikam does not exist".to_string()
            )
        );

        let err = classify(
            RemoteFailure::message("404 Not Found: pipeline 7 not found"),
            Operation::TriggerPipeline,
        );
        assert_eq!(
            err,
            Error::ResourceNotFound(
                "Pipeline or project not found: 404 Not Found: pipeline 7 not found".to_string()
            )
        );
    }

    #[test]
    fn test_authentication_wins_over_not_found() {
        let err = classify(
            RemoteFailure::message("got 404 after 401"),
            Operation::TriggerPipeline,
        );
        assert!(matches!(err, Error::Authentication(_)));
    }

    #[test]
    fn test_signals_are_case_sensitive() {
        let err = classify(
            RemoteFailure::message("unauthorized: NOT FOUND"),
            Operation::ListPipelines,
        );
        assert_eq!(
            err,
            Error::Generic("Failed to list pipelines: unauthorized: NOT FOUND".to_string())
        );
    }

    #[test]
    fn test_unmatched_message_is_generic() {
        let err = classify(
            RemoteFailure::message("connection reset by peer"),
            Operation::TriggerPipeline,
        );
        assert_eq!(
            err,
            Error::Generic("Failed to trigger pipeline: connection reset by peer".to_string())
        );
    }

    #[test]
    fn test_opaque_failure_is_generic_even_with_signals() {
        let err = classify(RemoteFailure::opaque("401"), Operation::ListPipelines);
        assert_eq!(
            err,
            Error::Generic("Failed to list pipelines: \"401\"".to_string())
        );

        let err = classify(RemoteFailure::opaque(()), Operation::TriggerPipeline);
        assert!(matches!(err, Error::Generic(_)));
        assert!(err.message().contains("trigger pipeline"));
    }

    #[test]
    fn test_display_is_message() {
        let err = Error::Authentication("Failed to authenticate: nope".to_string());
        assert_eq!(err.to_string(), "Failed to authenticate: nope");
        assert_eq!(err.message(), "Failed to authenticate: nope");
    }
}
