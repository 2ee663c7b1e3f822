//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself. Transport failures (`ActorClosed`,
//! `ActorDropped`, `DeadlineExceeded`) mean the service never gave a definitive answer and
//! are kept apart from domain answers (`NotFound`, `EntityError`) so callers can tell
//! "the service said no" from "the service did not answer".

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Deadline exceeded before the actor answered")]
    DeadlineExceeded,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// True when the actor gave no answer at all.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ActorClosed | Self::ActorDropped | Self::DeadlineExceeded
        )
    }

    /// Recovers the entity's own error type from an `EntityError`.
    ///
    /// Any other variant, or an entity error of a different type, is handed back unchanged.
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::EntityError(inner) => inner
                .downcast::<E>()
                .map(|e| *e)
                .map_err(FrameworkError::EntityError),
            other => Err(other),
        }
    }
}
