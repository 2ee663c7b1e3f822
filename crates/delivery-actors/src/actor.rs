//! # Resource Actor
//!
//! The server half of a stored resource. A `ResourceActor` owns its entity store and the
//! receiving end of its mailbox, and processes one request at a time, so the store needs no
//! lock.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor and a cloneable client.
/// 2.  **Wire**: pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop in a background task.
///
/// ```rust
/// use delivery_actors::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Ticket { id: u32, open: bool }
/// #[derive(Debug)] struct TicketCreate;
/// #[derive(Debug)] enum TicketAction { Close }
/// #[derive(Debug)] struct OpenTickets;
/// #[derive(Debug, thiserror::Error)] #[error("ticket error")] struct TicketError;
///
/// #[async_trait]
/// impl ActorEntity for Ticket {
///     type Id = u32;
///     type Create = TicketCreate;
///     type Update = ();
///     type Action = TicketAction;
///     type ActionResult = ();
///     type Query = OpenTickets;
///     type Context = ();
///     type Error = TicketError;
///
///     fn from_create_params(id: u32, _: TicketCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, open: true })
///     }
///     fn matches(&self, _: &OpenTickets) -> bool { self.open }
///     async fn on_update(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: TicketAction, _: &()) -> Result<(), Self::Error> {
///         self.open = false;
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Ticket>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let id = client.create(TicketCreate).await.unwrap();
///     client.perform_action(id, TicketAction::Close).await.unwrap();
///     assert!(client.query(OpenTickets).await.unwrap().is_empty());
/// }
/// ```
///
/// # Operations
///
/// * **Create**: takes the next id from the counter, builds the entity, runs `on_create`,
///   checks `conflicts_with` against the store and inserts.
/// * **Get**: returns a clone, or `None`.
/// * **Update**: runs `on_update` on a copy, checks conflicts against the other entities and
///   swaps the copy in.
/// * **Delete**: runs `on_delete`, then removes.
/// * **Action**: runs `handle_action` against the stored entity.
/// * **Query**: returns clones of every entity that `matches`, in id order.
///
/// A request whose caller already stopped waiting is skipped, so a timed-out write never
/// lands behind the caller's back.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the mailbox capacity; senders wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    fn conflict(&self, candidate: &T, skip: Option<&T::Id>) -> Option<T::Error> {
        self.store
            .iter()
            .filter(|(id, _)| Some(*id) != skip)
            .find_map(|(_, other)| candidate.conflicts_with(other))
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// `context` is handed to every entity hook.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = crate::short_type_name::<T>();
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            // A caller that gave up must not see its write land afterwards.
            if msg.is_abandoned() {
                debug!(entity_type, "Caller gone, request skipped");
                continue;
            }
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);

                    let mut item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                    };
                    if let Err(e) = item.on_create(&context).await {
                        warn!(entity_type, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    if let Some(e) = self.conflict(&item, None) {
                        warn!(entity_type, error = %e, "Create conflicts with existing entity");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }

                    self.next_id += 1;
                    self.store.insert(id.clone(), item);
                    info!(entity_type, %id, size = self.store.len(), "Created");
                    let _ = respond_to.send(Ok(id));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(current) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };

                    let mut candidate = current.clone();
                    if let Err(e) = candidate.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    if let Some(e) = self.conflict(&candidate, Some(&id)) {
                        warn!(entity_type, %id, error = %e, "Update conflicts with existing entity");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }

                    self.store.insert(id.clone(), candidate.clone());
                    info!(entity_type, %id, "Updated");
                    let _ = respond_to.send(Ok(candidate));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        self.store.remove(&id);
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                        match &result {
                            Ok(_) => info!(entity_type, %id, "Action ok"),
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Query { query, respond_to } => {
                    let matches: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| item.matches(&query))
                        .cloned()
                        .collect();
                    debug!(entity_type, ?query, hits = matches.len(), "Query");
                    let _ = respond_to.send(Ok(matches));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
