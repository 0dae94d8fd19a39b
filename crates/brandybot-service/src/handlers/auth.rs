//! Sign-in sync handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use brandybot_core::{ProfileUpdate, User};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::{ApiJson, Envelope};
use crate::state::AppState;

/// Sync request sent by the frontend after sign-in.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Display name from the identity provider.
    pub display_name: Option<String>,
    /// Avatar URL from the identity provider.
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// `{ user }` payload.
#[derive(Debug, Serialize)]
pub struct UserPayload {
    /// The user.
    pub user: User,
}

/// Refresh profile fields from the client and record the sign-in.
pub async fn sync(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<SyncRequest>,
) -> Result<Json<Envelope<UserPayload>>, ApiError> {
    let mut user = auth.user;
    user.apply_profile(ProfileUpdate {
        display_name: body.display_name,
        photo_url: body.photo_url,
        preferences: None,
    });
    user.touch_login();
    state.store.update_user(&user).await?;

    tracing::info!(user_id = %user.id, "User synced");

    Ok(Json(Envelope::new(UserPayload { user })))
}

/// Current user.
pub async fn me(auth: AuthUser) -> Json<Envelope<UserPayload>> {
    Json(Envelope::new(UserPayload { user: auth.user }))
}
