//! # Mocks & Testing Guide
//!
//! [`MockClient<T>`] answers requests sent through a real [`ResourceClient<T>`] from a script
//! of expectations, without spawning the actor. Code built on clients (wrappers, validators,
//! orchestrators) can then be tested deterministically, including against failures that are
//! hard to provoke from a real actor: a closed mailbox, a dropped reply, a service that never
//! answers.
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | **State** | scripted answers | real store |
//! | **Use case** | logic *around* a client | the actor itself, full flows |
//! | **Failure injection** | `return_err`, `stall` | hard |
//!
//! ```rust
//! use delivery_actors::mock::MockClient;
//! use delivery_actors::{ActorEntity, Deadline, FrameworkError};
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! #[derive(Clone, Debug)] struct Rider { id: u32 }
//! #[derive(Debug)] struct RiderCreate;
//! #[derive(Debug)] struct AllRiders;
//! #[derive(Debug, thiserror::Error)] #[error("rider error")] struct RiderError;
//!
//! #[async_trait]
//! impl ActorEntity for Rider {
//!     type Id = u32; type Create = RiderCreate; type Update = (); type Action = ();
//!     type ActionResult = (); type Query = AllRiders; type Context = (); type Error = RiderError;
//!     fn from_create_params(id: u32, _: RiderCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     fn matches(&self, _: &AllRiders) -> bool { true }
//!     async fn on_update(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Rider>::new();
//!     mock.expect_query().return_ok(vec![Rider { id: 4 }]);
//!     mock.expect_get(9).return_err(FrameworkError::ActorClosed);
//!     mock.expect_get(5).stall();
//!
//!     let client = mock.client();
//!     assert_eq!(client.query(AllRiders).await.unwrap().len(), 1);
//!     assert!(matches!(client.get(9).await, Err(FrameworkError::ActorClosed)));
//!
//!     let bounded = client.with_deadline(Deadline::after(Duration::from_millis(20)));
//!     assert!(matches!(bounded.get(5).await, Err(FrameworkError::DeadlineExceeded)));
//!     mock.verify();
//! }
//! ```
//!
//! For raw channel access use [`create_mock_client`] with [`expect_create`] and answer the
//! request by hand.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

/// A scripted answer. `None` means the mock holds the reply channel open and never answers.
type Scripted<R> = Option<Result<R, FrameworkError>>;

/// An expected request and the answer to give it.
enum Expectation<T: ActorEntity> {
    Get { id: T::Id, response: Scripted<Option<T>> },
    Create { response: Scripted<T::Id> },
    Update { id: T::Id, response: Scripted<T> },
    Delete { id: T::Id, response: Scripted<()> },
    Action { id: T::Id, response: Scripted<T::ActionResult> },
    Query { response: Scripted<Vec<T>> },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<T: ActorEntity>(expectations: &Expectations<T>) -> MutexGuard<'_, VecDeque<Expectation<T>>> {
    expectations.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Answers `respond_to` with the scripted response, or parks it when the script says stall.
fn answer<R>(
    respond_to: oneshot::Sender<Result<R, FrameworkError>>,
    response: Scripted<R>,
    parked: &mut Vec<Box<dyn std::any::Any + Send>>,
) where
    R: Send + 'static,
{
    match response {
        Some(response) => {
            let _ = respond_to.send(response);
        }
        None => parked.push(Box::new(respond_to)),
    }
}

/// A mock client with expectation tracking for fluent testing.
///
/// Requests must arrive in the order expectations were registered and the ids must match;
/// anything else panics the background task, which the caller observes as
/// [`FrameworkError::ActorDropped`].
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let script = expectations.clone();

        let handle = tokio::spawn(async move {
            let mut parked = Vec::new();
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&script).pop_front();

                match (request, expectation) {
                    (
                        ResourceRequest::Get { id, respond_to },
                        Some(Expectation::Get { id: expected, response }),
                    ) if id == expected => answer(respond_to, response, &mut parked),
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => answer(respond_to, response, &mut parked),
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update { id: expected, response }),
                    ) if id == expected => answer(respond_to, response, &mut parked),
                    (
                        ResourceRequest::Delete { id, respond_to },
                        Some(Expectation::Delete { id: expected, response }),
                    ) if id == expected => answer(respond_to, response, &mut parked),
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: expected, response }),
                    ) if id == expected => answer(respond_to, response, &mut parked),
                    (
                        ResourceRequest::Query { respond_to, .. },
                        Some(Expectation::Query { response }),
                    ) => answer(respond_to, response, &mut parked),
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Get { id, response })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(move |response| Expectation::Action { id, response })
    }

    pub fn expect_query(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::Query { response })
    }

    fn builder<R>(
        &mut self,
        make: impl FnOnce(Scripted<R>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            make: Box::new(make),
            expectations: self.expectations.clone(),
        }
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Builder finishing one expectation with its answer.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    make: Box<dyn FnOnce(Scripted<R>) -> Expectation<T> + Send>,
    expectations: Expectations<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn push(self, response: Scripted<R>) {
        let expectation = (self.make)(response);
        lock(&self.expectations).push_back(expectation);
    }

    /// Answer with a value.
    pub fn return_ok(self, value: R) {
        self.push(Some(Ok(value)));
    }

    /// Answer with an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Some(Err(error)));
    }

    /// Never answer; the caller waits until its deadline.
    pub fn stall(self) {
        self.push(None);
    }
}

// =============================================================================
// RAW CHANNEL HELPERS
// =============================================================================

/// Creates a client whose requests land on a receiver the test drives by hand.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message, if it is a Create request.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Deadline;
    use async_trait::async_trait;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    struct Merchant {
        id: u32,
        name: String,
    }

    #[derive(Debug)]
    struct MerchantCreate {
        name: String,
    }

    #[derive(Debug)]
    struct ByName(String);

    #[derive(Debug, thiserror::Error)]
    #[error("Merchant error")]
    struct MerchantError;

    #[async_trait]
    impl ActorEntity for Merchant {
        type Id = u32;
        type Create = MerchantCreate;
        type Update = ();
        type Action = ();
        type ActionResult = ();
        type Query = ByName;
        type Context = ();
        type Error = MerchantError;

        fn from_create_params(id: u32, params: MerchantCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                name: params.name,
            })
        }

        fn matches(&self, query: &ByName) -> bool {
            self.name == query.0
        }

        async fn on_update(&mut self, _update: (), _ctx: &Self::Context) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn handle_action(&mut self, _action: (), _ctx: &Self::Context) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_raw_channel_create() {
        let (client, mut receiver) = create_mock_client::<Merchant>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(MerchantCreate {
                    name: "Casa Lupe".to_string(),
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.name, "Casa Lupe");
        responder.send(Ok(7)).unwrap();

        assert_eq!(create_task.await.unwrap().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_scripted_answers_in_order() {
        let mut mock = MockClient::<Merchant>::new();
        mock.expect_create().return_ok(1);
        mock.expect_query().return_ok(vec![Merchant {
            id: 1,
            name: "Casa Lupe".to_string(),
        }]);

        let client = mock.client();
        let id = client
            .create(MerchantCreate {
                name: "Casa Lupe".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(id, 1);

        let found = client.query(ByName("Casa Lupe".to_string())).await.unwrap();
        assert_eq!(found.len(), 1);

        mock.verify();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_answer_hits_deadline() {
        let mut mock = MockClient::<Merchant>::new();
        mock.expect_get(3).stall();

        let client = mock
            .client()
            .with_deadline(Deadline::after(Duration::from_secs(2)));
        let result = client.get(3).await;

        assert!(matches!(result, Err(FrameworkError::DeadlineExceeded)));
        mock.verify();
    }

    #[tokio::test]
    async fn test_unexpected_request_surfaces_as_dropped() {
        let mut mock = MockClient::<Merchant>::new();
        mock.expect_get(1).return_ok(None);

        let result = mock.client().get(2).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }
}
