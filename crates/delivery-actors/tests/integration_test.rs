use async_trait::async_trait;
use delivery_actors::{
    ActorEntity, ActorService, Deadline, FrameworkError, ResourceActor, ServiceActor,
};
use std::time::Duration;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Courier {
    id: u32,
    handle: String,
    on_shift: bool,
}

#[derive(Debug)]
struct CourierCreate {
    handle: String,
}

#[derive(Debug)]
struct CourierUpdate {
    handle: Option<String>,
}

#[derive(Debug)]
enum CourierAction {
    StartShift,
}

#[derive(Debug)]
enum CourierQuery {
    OnShift,
    All,
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum CourierError {
    #[error("handle taken: {0}")]
    HandleTaken(String),
    #[error("handle must not be empty")]
    EmptyHandle,
}

#[async_trait]
impl ActorEntity for Courier {
    type Id = u32;
    type Create = CourierCreate;
    type Update = CourierUpdate;
    type Action = CourierAction;
    type ActionResult = bool;
    type Query = CourierQuery;
    type Context = ();
    type Error = CourierError;

    fn from_create_params(id: u32, params: CourierCreate) -> Result<Self, Self::Error> {
        if params.handle.is_empty() {
            return Err(CourierError::EmptyHandle);
        }
        Ok(Self {
            id,
            handle: params.handle,
            on_shift: false,
        })
    }

    fn matches(&self, query: &CourierQuery) -> bool {
        match query {
            CourierQuery::OnShift => self.on_shift,
            CourierQuery::All => true,
        }
    }

    fn conflicts_with(&self, other: &Self) -> Option<Self::Error> {
        (self.handle == other.handle).then(|| CourierError::HandleTaken(self.handle.clone()))
    }

    async fn on_update(
        &mut self,
        update: CourierUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error> {
        if let Some(handle) = update.handle {
            if handle.is_empty() {
                return Err(CourierError::EmptyHandle);
            }
            self.handle = handle;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CourierAction,
        _ctx: &Self::Context,
    ) -> Result<bool, Self::Error> {
        match action {
            CourierAction::StartShift => {
                let changed = !self.on_shift;
                self.on_shift = true;
                Ok(changed)
            }
        }
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Courier>::new(10);
    tokio::spawn(actor.run(()));

    // 1. Create
    let id: u32 = client
        .create(CourierCreate {
            handle: "ana".into(),
        })
        .await
        .unwrap();
    assert_eq!(id, 1);

    // 2. Action
    let changed = client
        .perform_action(id, CourierAction::StartShift)
        .await
        .unwrap();
    assert!(changed);
    let again = client
        .perform_action(id, CourierAction::StartShift)
        .await
        .unwrap();
    assert!(!again);

    // 3. Update
    let updated: Courier = client
        .update(
            id,
            CourierUpdate {
                handle: Some("ana-m".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.handle, "ana-m");

    // 4. Delete
    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
    assert!(matches!(
        client.delete(id).await,
        Err(FrameworkError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_query_returns_matches_in_id_order() {
    let (actor, client) = ResourceActor::<Courier>::new(10);
    tokio::spawn(actor.run(()));

    for handle in ["ana", "bo", "cy"] {
        client
            .create(CourierCreate {
                handle: handle.into(),
            })
            .await
            .unwrap();
    }
    client
        .perform_action(3, CourierAction::StartShift)
        .await
        .unwrap();
    client
        .perform_action(1, CourierAction::StartShift)
        .await
        .unwrap();

    let on_shift: Vec<u32> = client
        .query(CourierQuery::OnShift)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(on_shift, vec![1, 3]);
    assert_eq!(client.query(CourierQuery::All).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_conflicting_writes_are_rejected() {
    let (actor, client) = ResourceActor::<Courier>::new(10);
    tokio::spawn(actor.run(()));

    let first = client
        .create(CourierCreate {
            handle: "ana".into(),
        })
        .await
        .unwrap();
    let second = client
        .create(CourierCreate {
            handle: "bo".into(),
        })
        .await
        .unwrap();

    let duplicate = client
        .create(CourierCreate {
            handle: "ana".into(),
        })
        .await
        .unwrap_err()
        .into_entity_error::<CourierError>()
        .unwrap();
    assert_eq!(duplicate, CourierError::HandleTaken("ana".into()));

    // Renaming onto another courier's handle fails and leaves the courier untouched.
    let clash = client
        .update(
            second,
            CourierUpdate {
                handle: Some("ana".into()),
            },
        )
        .await;
    assert!(clash.is_err());
    assert_eq!(client.get(second).await.unwrap().unwrap().handle, "bo");

    // Keeping one's own handle is not a conflict.
    let same = client
        .update(
            first,
            CourierUpdate {
                handle: Some("ana".into()),
            },
        )
        .await;
    assert!(same.is_ok());

    // Rejected creates do not burn ids.
    let third = client
        .create(CourierCreate {
            handle: "cy".into(),
        })
        .await
        .unwrap();
    assert_eq!(third, 3);
}

#[tokio::test]
async fn test_failed_update_leaves_entity_unchanged() {
    let (actor, client) = ResourceActor::<Courier>::new(10);
    tokio::spawn(actor.run(()));

    let id = client
        .create(CourierCreate {
            handle: "ana".into(),
        })
        .await
        .unwrap();
    let result = client
        .update(
            id,
            CourierUpdate {
                handle: Some(String::new()),
            },
        )
        .await;

    assert!(matches!(result, Err(FrameworkError::EntityError(_))));
    assert_eq!(client.get(id).await.unwrap().unwrap().handle, "ana");
}

#[tokio::test]
async fn test_closed_actor_is_a_transport_error() {
    let (actor, client) = ResourceActor::<Courier>::new(10);
    drop(actor);

    let err = client.get(1).await.unwrap_err();
    assert!(matches!(err, FrameworkError::ActorClosed));
    assert!(err.is_transport());
}

/// A create whose caller gave up while it sat in the mailbox is never applied.
#[tokio::test(start_paused = true)]
async fn test_abandoned_create_leaves_store_empty() {
    let (actor, client) = ResourceActor::<Courier>::new(10);

    let impatient = client.with_deadline(Deadline::after(Duration::from_secs(1)));
    let result = impatient
        .create(CourierCreate {
            handle: "ana".into(),
        })
        .await;
    assert!(matches!(result, Err(FrameworkError::DeadlineExceeded)));

    tokio::spawn(actor.run(()));
    assert!(client.query(CourierQuery::All).await.unwrap().is_empty());

    // The skipped request did not consume an id either
    let id = client
        .create(CourierCreate {
            handle: "ana".into(),
        })
        .await
        .unwrap();
    assert_eq!(id, 1);
}

// --- Service actor ---

struct Dispatcher;

#[derive(Debug)]
enum DispatchRequest {
    Echo(u32),
    Hang,
}

#[async_trait]
impl ActorService for Dispatcher {
    type Request = DispatchRequest;
    type Response = u32;

    async fn handle(&self, request: DispatchRequest) -> u32 {
        match request {
            DispatchRequest::Echo(n) => n,
            DispatchRequest::Hang => std::future::pending().await,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_request_does_not_block_the_next() {
    let (actor, client) = ServiceActor::new(10);
    let handle = tokio::spawn(actor.run(Dispatcher));

    let hanging = client.with_deadline(Deadline::after(Duration::from_secs(5)));
    let stuck = tokio::spawn(async move { hanging.call(DispatchRequest::Hang).await });

    assert_eq!(client.call(DispatchRequest::Echo(42)).await.unwrap(), 42);

    let stuck = stuck.await.unwrap();
    assert!(matches!(stuck, Err(FrameworkError::DeadlineExceeded)));

    // The abandoned request is dropped server-side, so shutdown completes.
    drop(client);
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_call_timeout_and_deadline_take_the_earlier() {
    let (actor, client) = ServiceActor::new(10);
    tokio::spawn(actor.run(Dispatcher));
    let client = client.with_call_timeout(Duration::from_secs(1));

    let started = tokio::time::Instant::now();
    let result = client
        .with_deadline(Deadline::after(Duration::from_secs(30)))
        .call(DispatchRequest::Hang)
        .await;

    assert!(matches!(result, Err(FrameworkError::DeadlineExceeded)));
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(1) && waited < Duration::from_secs(2));
}
