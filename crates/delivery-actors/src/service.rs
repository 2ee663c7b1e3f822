//! # Service Actors
//!
//! Not every backend owns a store. A token authority, for example, only answers requests
//! using its configuration and other services. [`ActorService`] describes such a stateless
//! request/response service, [`ServiceActor`] serves it from a mailbox, and [`ServiceClient`]
//! is the cloneable handle callers use.
//!
//! Unlike [`ResourceActor`](crate::ResourceActor), a `ServiceActor` handles each request in
//! its own task, so one slow request never holds up the next. A request whose caller has
//! gone away (deadline passed, client disconnected) is abandoned instead of run to the end.

use crate::deadline::{self, Deadline};
use crate::error::FrameworkError;
use crate::message::ServiceRequest;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, info};

/// A stateless request/response service.
///
/// Domain failures belong in `Response` (typically a `Result`); the framework only adds
/// transport failures on top.
#[async_trait]
pub trait ActorService: Send + Sync + 'static {
    type Request: Send + Debug + 'static;
    type Response: Send + Debug + 'static;

    async fn handle(&self, request: Self::Request) -> Self::Response;
}

/// The server half of an [`ActorService`].
pub struct ServiceActor<S: ActorService> {
    receiver: mpsc::Receiver<ServiceRequest<S>>,
}

impl<S: ActorService> ServiceActor<S> {
    pub fn new(buffer_size: usize) -> (Self, ServiceClient<S>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver }, ServiceClient::new(sender))
    }

    /// Serves requests until every client is dropped, then waits for in-flight ones.
    pub async fn run(mut self, service: S) {
        let service_type = crate::short_type_name::<S>();
        let service = Arc::new(service);
        let mut in_flight = JoinSet::new();
        info!(service_type, "Service started");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    let Some(ServiceRequest { request, mut respond_to }) = msg else {
                        break;
                    };
                    debug!(service_type, ?request, "Request");
                    let service = Arc::clone(&service);
                    in_flight.spawn(async move {
                        tokio::select! {
                            response = service.handle(request) => {
                                let _ = respond_to.send(Ok(response));
                            }
                            () = respond_to.closed() => {
                                debug!(service_type, "Caller gone, request abandoned");
                            }
                        }
                    });
                }
                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
            }
        }

        while in_flight.join_next().await.is_some() {}
        info!(service_type, "Shutdown");
    }
}

/// Cloneable handle to a [`ServiceActor`], with the same call bounds as
/// [`ResourceClient`](crate::ResourceClient).
pub struct ServiceClient<S: ActorService> {
    sender: mpsc::Sender<ServiceRequest<S>>,
    call_timeout: Option<Duration>,
    deadline: Option<Deadline>,
}

impl<S: ActorService> Clone for ServiceClient<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            call_timeout: self.call_timeout,
            deadline: self.deadline,
        }
    }
}

impl<S: ActorService> ServiceClient<S> {
    pub fn new(sender: mpsc::Sender<ServiceRequest<S>>) -> Self {
        Self {
            sender,
            call_timeout: None,
            deadline: None,
        }
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    pub fn with_deadline(&self, deadline: Deadline) -> Self {
        Self {
            deadline: Some(deadline),
            ..self.clone()
        }
    }

    pub async fn call(&self, request: S::Request) -> Result<S::Response, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        let exchange = async {
            self.sender
                .send(ServiceRequest {
                    request,
                    respond_to,
                })
                .await
                .map_err(|_| FrameworkError::ActorClosed)?;
            response.await.map_err(|_| FrameworkError::ActorDropped)?
        };
        deadline::bounded(deadline::expiry(self.deadline, self.call_timeout), exchange).await
    }
}
