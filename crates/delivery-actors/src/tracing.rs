//! # Observability
//!
//! Structured logging for every actor and service. Actors log with an `entity_type` (or
//! `service_type`) field instead of module paths, so the subscriber hides targets.
//!
//! ```bash
//! RUST_LOG=info cargo run      # lifecycle and writes
//! RUST_LOG=debug cargo run     # request payloads and queries
//! RUST_LOG=delivery_platform::auth=debug,info cargo run
//! ```
//!
//! With `RUST_LOG=info` an order placement reads roughly:
//!
//! ```text
//! INFO Created entity_type="User" id=user_1 size=1
//! INFO place_order: Order placed order_id=order_1 merchant_id=merchant_7 total=13.50
//! INFO Created entity_type="Order" id=order_1 size=1
//! ```

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
