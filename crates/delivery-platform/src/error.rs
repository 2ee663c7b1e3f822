//! Errors shared across service boundaries.
//!
//! Per-actor errors live next to their actor (`user_actor::UserError`, ...). The types here
//! describe what a *caller* sees when a downstream service fails to give an answer, or when
//! persistence fails, independent of which service was involved.

use delivery_actors::FrameworkError;
use thiserror::Error;

/// A downstream service gave no usable answer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("{service} did not answer before the deadline")]
    DeadlineExceeded { service: &'static str },

    #[error("{service} unavailable: {reason}")]
    Unavailable {
        service: &'static str,
        reason: String,
    },
}

impl UpstreamError {
    pub fn from_framework(service: &'static str, error: FrameworkError) -> Self {
        match error {
            FrameworkError::DeadlineExceeded => Self::DeadlineExceeded { service },
            other => Self::Unavailable {
                service,
                reason: other.to_string(),
            },
        }
    }

    pub fn service(&self) -> &'static str {
        match self {
            Self::DeadlineExceeded { service } | Self::Unavailable { service, .. } => service,
        }
    }
}

/// The order store could not persist or load an aggregate. Callers only learn that it failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("persistence failure: {0}")]
pub struct PersistenceError(pub String);
