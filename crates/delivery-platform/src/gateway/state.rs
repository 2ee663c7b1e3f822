//! Shared application state handed to every handler.

use crate::auth::{AuthDelegate, TokenAuthority};
use crate::clients::{CatalogClient, UserClient};
use crate::ordering::OrderOrchestrator;
use std::sync::Arc;
use std::time::Duration;

/// Everything a handler can reach. Cloned per request, so every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Validates bearer tokens on protected routes.
    pub auth: AuthDelegate,
    /// Issues tokens on login.
    pub authority: Arc<dyn TokenAuthority>,
    pub orders: Arc<OrderOrchestrator>,
    pub users: UserClient,
    pub catalog: CatalogClient,
    /// Budget of one inbound request, turned into a [`Deadline`](delivery_actors::Deadline)
    /// by the deadline middleware.
    pub request_timeout: Duration,
}
