//! Startup data: the bootstrap admin account and an optional demo menu.

use super::DeliveryPlatform;
use crate::auth::password::{self, PasswordError};
use crate::catalog_actor::CatalogError;
use crate::config::BootstrapConfig;
use crate::model::{MerchantId, ProductCreate, Role, UserCreate};
use crate::user_actor::UserError;
use delivery_actors::Deadline;
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use tracing::{info, warn};

/// Merchant that owns the demo menu.
pub const DEMO_MERCHANT: MerchantId = MerchantId(1);

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("bootstrap admin: {0}")]
    Password(#[from] PasswordError),
    #[error("bootstrap admin: {0}")]
    User(#[from] UserError),
    #[error("demo catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Creates the admin account and the demo menu as configured.
///
/// An admin whose email is already registered is left alone, so restarting against the same
/// services is harmless.
pub async fn bootstrap(
    platform: &DeliveryPlatform,
    config: &BootstrapConfig,
    deadline: Deadline,
) -> Result<(), SeedError> {
    match (&config.admin_email, &config.admin_password) {
        (Some(email), Some(secret)) => {
            create_admin(platform, email, secret.clone(), deadline).await?;
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("DELIVERY_ADMIN_EMAIL and DELIVERY_ADMIN_PASSWORD must be set together; no admin created");
        }
        (None, None) => {}
    }

    if config.seed_demo {
        seed_demo_catalog(platform, deadline).await?;
    }
    Ok(())
}

async fn create_admin(
    platform: &DeliveryPlatform,
    email: &str,
    secret: SecretString,
    deadline: Deadline,
) -> Result<(), SeedError> {
    let password_hash = password::hash_secret(secret).await?;
    let params = UserCreate {
        email: email.to_string(),
        password_hash,
        name: "Administrator".to_string(),
        phone: String::new(),
        role: Role::Admin,
    };

    match platform.user_client.create_user(params, deadline).await {
        Ok(id) => {
            info!(user_id = %id, "Bootstrap admin created");
            Ok(())
        }
        Err(UserError::AlreadyExists(_)) => {
            info!("Bootstrap admin already present");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Four dishes of one restaurant, one of them sold out.
pub fn demo_menu() -> Vec<ProductCreate> {
    let dish = |name: &str, description: &str, cents: i64, category: &str, available: bool| {
        ProductCreate {
            merchant_id: DEMO_MERCHANT,
            name: name.to_string(),
            description: description.to_string(),
            price: Decimal::new(cents, 2),
            available,
            category: category.to_string(),
        }
    };
    vec![
        dish("Margherita", "Tomato, mozzarella, basil", 850, "pizza", true),
        dish("Diavola", "Spicy salami, chili", 1050, "pizza", true),
        dish("Tiramisu", "House made", 550, "dessert", true),
        dish("Truffle Risotto", "Seasonal", 1800, "mains", false),
    ]
}

async fn seed_demo_catalog(
    platform: &DeliveryPlatform,
    deadline: Deadline,
) -> Result<(), SeedError> {
    let menu = demo_menu();
    let count = menu.len();
    for product in menu {
        platform
            .catalog_client
            .create_product(product, deadline)
            .await?;
    }
    info!(merchant_id = %DEMO_MERCHANT, products = count, "Demo catalog seeded");
    Ok(())
}
