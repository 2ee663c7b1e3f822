use delivery_actors::Deadline;
use delivery_platform::auth::SystemClock;
use delivery_platform::config::Config;
use delivery_platform::gateway;
use delivery_platform::lifecycle::{bootstrap, setup_tracing, DeliveryPlatform};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    // Setup tracing once for the entire application
    setup_tracing();
    info!(?config, "Configuration loaded");

    let platform = DeliveryPlatform::start(&config.auth, &config.services, Arc::new(SystemClock));
    if let Err(e) = bootstrap(
        &platform,
        &config.bootstrap,
        Deadline::after(config.gateway.request_timeout),
    )
    .await
    {
        error!(error = %e, "Bootstrap failed");
        platform.shutdown().await?;
        return Err(e.into());
    }

    let app = gateway::router(platform.app_state(config.gateway.request_timeout));
    let addr = config.gateway.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    platform.shutdown().await?;
    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
