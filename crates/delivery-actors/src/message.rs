//! # Messages
//!
//! Envelopes sent from clients to actors. Each carries a one-shot `respond_to` channel the
//! actor answers on.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::service::ActorService;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request sent to a [`ResourceActor`](crate::ResourceActor).
///
/// Variants map onto the lifecycle of a stored resource: `Create`, `Get`, `Update` and
/// `Delete`, plus `Action` for resource-specific state changes and `Query` for filtered reads.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Query {
        query: T::Query,
        respond_to: Response<Vec<T>>,
    },
}

impl<T: ActorEntity> ResourceRequest<T> {
    /// Whether the caller stopped waiting for the answer (deadline passed or future dropped).
    pub fn is_abandoned(&self) -> bool {
        match self {
            Self::Create { respond_to, .. } => respond_to.is_closed(),
            Self::Get { respond_to, .. } => respond_to.is_closed(),
            Self::Update { respond_to, .. } => respond_to.is_closed(),
            Self::Delete { respond_to, .. } => respond_to.is_closed(),
            Self::Action { respond_to, .. } => respond_to.is_closed(),
            Self::Query { respond_to, .. } => respond_to.is_closed(),
        }
    }
}

/// Request sent to a [`ServiceActor`](crate::ServiceActor).
#[derive(Debug)]
pub struct ServiceRequest<S: ActorService> {
    pub request: S::Request,
    pub respond_to: Response<S::Response>,
}
