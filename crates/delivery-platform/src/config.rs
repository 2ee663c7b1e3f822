//! Platform configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `AUTH_JWT_SECRET` - Token signing secret (min 32 bytes)
//!
//! ## Optional
//! - `GATEWAY_HOST` - Bind address (default: 127.0.0.1)
//! - `GATEWAY_PORT` - Listen port (default: 8080)
//! - `GATEWAY_REQUEST_TIMEOUT_MS` - Deadline for one inbound request (default: 10000)
//! - `AUTH_TOKEN_TTL_SECS` - Token lifetime (default: 86400)
//! - `AUTH_CALL_TIMEOUT_MS` - Auth delegate → token authority timeout (default: 5000)
//! - `CATALOG_CALL_TIMEOUT_MS` - Order validator → catalog timeout (default: 5000)
//! - `SERVICE_CALL_TIMEOUT_MS` - Any other service call (default: 5000)
//! - `ACTOR_MAILBOX_SIZE` - Channel capacity per service (default: 64)
//! - `DELIVERY_ADMIN_EMAIL`, `DELIVERY_ADMIN_PASSWORD` - Bootstrap admin account
//! - `DELIVERY_SEED_DEMO` - Seed a demo restaurant menu (default: false)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
    pub services: ServiceConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Deadline stamped on every inbound request and propagated downstream.
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
    pub token_ttl: chrono::Duration,
    pub call_timeout: Duration,
}

/// Wiring of the backend services.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub mailbox_size: usize,
    pub catalog_call_timeout: Duration,
    pub call_timeout: Duration,
}

/// Accounts and data created at startup.
#[derive(Clone, Default)]
pub struct BootstrapConfig {
    pub admin_email: Option<String>,
    pub admin_password: Option<SecretString>,
    pub seed_demo: bool,
}

impl std::fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "[REDACTED]"))
            .field("seed_demo", &self.seed_demo)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing, a value does not parse, or the
    /// signing secret is too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            gateway: GatewayConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            services: ServiceConfig::from_env()?,
            bootstrap: BootstrapConfig::from_env()?,
        })
    }
}

impl GatewayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: parse_env_or_default("GATEWAY_HOST", "127.0.0.1")?,
            port: parse_env_or_default("GATEWAY_PORT", "8080")?,
            request_timeout: millis_env_or_default("GATEWAY_REQUEST_TIMEOUT_MS", 10_000)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = get_required_secret("AUTH_JWT_SECRET")?;
        validate_jwt_secret(&jwt_secret, "AUTH_JWT_SECRET")?;
        let ttl_secs: u32 = parse_env_or_default("AUTH_TOKEN_TTL_SECS", "86400")?;

        Ok(Self {
            jwt_secret,
            token_ttl: chrono::Duration::seconds(i64::from(ttl_secs)),
            call_timeout: millis_env_or_default("AUTH_CALL_TIMEOUT_MS", 5_000)?,
        })
    }

    /// Defaults with the given signing secret. Used by tests and tools.
    pub fn with_secret(secret: &str) -> Self {
        Self {
            jwt_secret: SecretString::from(secret.to_string()),
            token_ttl: chrono::Duration::hours(24),
            call_timeout: Duration::from_secs(5),
        }
    }
}

impl ServiceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            mailbox_size: parse_env_or_default("ACTOR_MAILBOX_SIZE", "64")?,
            catalog_call_timeout: millis_env_or_default("CATALOG_CALL_TIMEOUT_MS", 5_000)?,
            call_timeout: millis_env_or_default("SERVICE_CALL_TIMEOUT_MS", 5_000)?,
        })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            mailbox_size: 64,
            catalog_call_timeout: Duration::from_secs(5),
            call_timeout: Duration::from_secs(5),
        }
    }
}

impl BootstrapConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            admin_email: get_optional_env("DELIVERY_ADMIN_EMAIL"),
            admin_password: get_optional_env("DELIVERY_ADMIN_PASSWORD").map(SecretString::from),
            seed_demo: parse_env_or_default("DELIVERY_SEED_DEMO", "false")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn millis_env_or_default(key: &str, default_ms: u64) -> Result<Duration, ConfigError> {
    let millis: u64 = parse_env_or_default(key, &default_ms.to_string())?;
    if millis == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than 0".to_string(),
        ));
    }
    Ok(Duration::from_millis(millis))
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_jwt_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} bytes (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}
