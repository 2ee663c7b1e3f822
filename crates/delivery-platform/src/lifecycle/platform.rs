use crate::auth::{AuthDelegate, AuthService, ClaimsCodec, Clock, TokenAuthority};
use crate::clients::{AuthClient, CatalogClient, OrderClient, UserClient};
use crate::config::{AuthConfig, ServiceConfig};
use crate::gateway::AppState;
use crate::order_actor::OrderContext;
use crate::ordering::OrderOrchestrator;
use crate::{catalog_actor, order_actor, user_actor};
use delivery_actors::ServiceActor;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running backend: one task per service, and the clients to reach them.
///
/// # Architecture
///
/// - **User actor**: accounts, looked up by email at login
/// - **Catalog actor**: products and their availability
/// - **Order actor**: the order store and its state machine
/// - **Auth service**: the token authority; reads users through its own [`UserClient`]
///
/// # Example
///
/// ```ignore
/// let platform = DeliveryPlatform::start(&config.auth, &config.services, Arc::new(SystemClock));
///
/// let id = platform.user_client.create_user(params, deadline).await?;
/// let app = gateway::router(platform.app_state(config.gateway.request_timeout));
///
/// // Gracefully shut down when done
/// platform.shutdown().await?;
/// ```
pub struct DeliveryPlatform {
    pub user_client: UserClient,
    pub catalog_client: CatalogClient,
    pub order_client: OrderClient,
    pub auth_client: AuthClient,
    auth_call_timeout: Duration,
    handles: Vec<JoinHandle<()>>,
}

impl DeliveryPlatform {
    /// Spawns every service and wires the clients between them.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start(auth: &AuthConfig, services: &ServiceConfig, clock: Arc<dyn Clock>) -> Self {
        // 1. Create actors (no dependencies)
        let (user_actor, user_client) = user_actor::new(services.mailbox_size);
        let (catalog_actor, catalog_client) = catalog_actor::new(services.mailbox_size);
        let (order_actor, order_client) = order_actor::new(services.mailbox_size);
        let (auth_actor, auth_client) = ServiceActor::<AuthService>::new(services.mailbox_size);

        let user_client = UserClient::new(user_client.with_call_timeout(services.call_timeout));
        let catalog_client =
            CatalogClient::new(catalog_client.with_call_timeout(services.catalog_call_timeout));
        let order_client = OrderClient::new(order_client.with_call_timeout(services.call_timeout));
        let auth_client = AuthClient::new(auth_client.with_call_timeout(auth.call_timeout));

        // 2. Start actors. The token authority reads accounts through its own user client;
        //    authority and order store share the clock.
        let authority = AuthService::new(
            Arc::new(user_client.clone()),
            ClaimsCodec::new(&auth.jwt_secret),
            clock.clone(),
            auth.token_ttl,
        );
        let handles = vec![
            tokio::spawn(user_actor.run(())),
            tokio::spawn(catalog_actor.run(())),
            tokio::spawn(order_actor.run(OrderContext { clock })),
            tokio::spawn(auth_actor.run(authority)),
        ];
        info!(mailbox_size = services.mailbox_size, "Delivery platform started");

        Self {
            user_client,
            catalog_client,
            order_client,
            auth_client,
            auth_call_timeout: auth.call_timeout,
            handles,
        }
    }

    pub fn auth_delegate(&self) -> AuthDelegate {
        AuthDelegate::new(Arc::new(self.auth_client.clone()), self.auth_call_timeout)
    }

    pub fn orchestrator(&self) -> OrderOrchestrator {
        OrderOrchestrator::new(
            Arc::new(self.catalog_client.clone()),
            Arc::new(self.order_client.clone()),
        )
    }

    /// Gateway state backed by this platform's clients.
    pub fn app_state(&self, request_timeout: Duration) -> AppState {
        let authority: Arc<dyn TokenAuthority> = Arc::new(self.auth_client.clone());
        AppState {
            auth: self.auth_delegate(),
            authority,
            orders: Arc::new(self.orchestrator()),
            users: self.user_client.clone(),
            catalog: self.catalog_client.clone(),
            request_timeout,
        }
    }

    /// Gracefully shuts down every service.
    ///
    /// Dropping the platform's clients closes the channels once no other clone is alive, so
    /// any [`AppState`] handed out must be dropped first. The auth service holds a user
    /// client of its own and releases it when it stops, which lets the user actor stop too.
    ///
    /// # Errors
    ///
    /// Returns an error if any service task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down delivery platform...");

        drop(self.auth_client);
        drop(self.order_client);
        drop(self.catalog_client);
        drop(self.user_client);

        let mut failed = 0usize;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Service task failed");
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(format!("{failed} service task(s) failed during shutdown"));
        }
        info!("Delivery platform shut down");
        Ok(())
    }
}
