//! Login.

use crate::auth::Credential;
use crate::gateway::error::{ApiError, Result};
use crate::gateway::extract::RequestDeadline;
use crate::gateway::state::AppState;
use crate::model::{Role, UserId};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// `POST /auth/login`
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    RequestDeadline(deadline): RequestDeadline,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(request) = body.map_err(ApiError::from)?;
    let credential = Credential {
        email: request.email,
        password: SecretString::from(request.password),
    };

    let issued = state.authority.issue_token(credential, deadline).await?;
    Ok(Json(LoginResponse {
        token: issued.token,
        user_id: issued.claims.sub,
        email: issued.claims.email,
        role: issued.claims.role,
        expires_at: issued.claims.expires_at,
    }))
}
