//! Account registration and management.

use crate::auth::{authorize, authorize_subject, password, Claims};
use crate::gateway::error::{ApiError, Result};
use crate::gateway::extract::{RequestDeadline, RequireAuth};
use crate::gateway::state::AppState;
use crate::model::{Role, User, UserCreate, UserId, UserUpdate};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use delivery_actors::{ActorClient, Deadline};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Customer
}

/// A user as the API shows it. The password hash never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            role: user.role,
        }
    }
}

/// Checks who may create an account with `role`.
///
/// Customers and couriers sign themselves up. Merchant accounts are created by an admin, and
/// admin accounts only come from bootstrap configuration.
async fn check_registration(
    state: &AppState,
    headers: &HeaderMap,
    role: Role,
    deadline: Deadline,
) -> Result<Option<Claims>> {
    match role {
        Role::Customer | Role::Courier => Ok(None),
        Role::Admin => Err(ApiError::bad_request(
            "role_not_allowed",
            "the ADMIN role cannot be assigned through registration",
        )),
        Role::Merchant => {
            let Some(header) = headers.get(AUTHORIZATION) else {
                return Err(ApiError::bad_request(
                    "role_not_allowed",
                    "MERCHANT accounts are created by an admin",
                ));
            };
            let claims = state
                .auth
                .authenticate(header.to_str().ok(), deadline)
                .await?;
            authorize(&claims, &[Role::Admin])?;
            Ok(Some(claims))
        }
    }
}

/// `POST /users`
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    headers: HeaderMap,
    body: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let Json(request) = body?;
    let sponsor = check_registration(&state, &headers, request.role, deadline).await?;

    let password_hash = password::hash_secret(SecretString::from(request.password)).await?;
    let id = state
        .users
        .create_user(
            UserCreate {
                email: request.email,
                password_hash,
                name: request.name,
                phone: request.phone,
                role: request.role,
            },
            deadline,
        )
        .await?;

    match sponsor {
        Some(admin) => {
            info!(user_id = %id, role = %request.role, by = %admin.sub, "User created")
        }
        None => info!(user_id = %id, role = %request.role, "User registered"),
    }
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// `GET /users`
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    RequestDeadline(deadline): RequestDeadline,
) -> Result<Json<Vec<UserView>>> {
    authorize(&claims, &[Role::Admin])?;
    let users = state.users.list_users(deadline).await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// `GET /users/{id}`
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    RequestDeadline(deadline): RequestDeadline,
    Path(id): Path<UserId>,
) -> Result<Json<UserView>> {
    authorize_subject(&claims, id)?;
    let user = state
        .users
        .get(id, deadline)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found: {id}")))?;
    Ok(Json(user.into()))
}

/// `PUT /users/{id}`
#[instrument(skip(state, claims, deadline, body))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    RequestDeadline(deadline): RequestDeadline,
    Path(id): Path<UserId>,
    body: std::result::Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<UserView>> {
    authorize_subject(&claims, id)?;
    let Json(update) = body?;
    let user = state.users.update_user(id, update, deadline).await?;
    Ok(Json(user.into()))
}

/// `DELETE /users/{id}`
///
/// Outstanding tokens of the deleted account stay valid until they expire.
#[instrument(skip(state, claims, deadline))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    RequestDeadline(deadline): RequestDeadline,
    Path(id): Path<UserId>,
) -> Result<StatusCode> {
    authorize(&claims, &[Role::Admin])?;
    state.users.delete(id, deadline).await?;
    info!(user_id = %id, by = %claims.sub, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
