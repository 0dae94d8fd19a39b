//! Profile and account handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use brandybot_core::{ProfileUpdate, User};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::{ApiJson, Envelope, MessageResponse};
use crate::state::AppState;

/// Current user's profile.
pub async fn get_profile(auth: AuthUser) -> Json<Envelope<User>> {
    Json(Envelope::new(auth.user))
}

/// Update display name and merge preferences.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<ProfileUpdate>,
) -> Result<Json<Envelope<User>>, ApiError> {
    let mut user = auth.user;
    // Avatar changes only arrive through sign-in sync.
    user.apply_profile(ProfileUpdate {
        photo_url: None,
        ..body
    });
    state.store.update_user(&user).await?;

    Ok(Json(Envelope::new(user)))
}

/// Delete the identity-provider account, then the user and everything they own.
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Envelope<MessageResponse>>, ApiError> {
    if let Err(e) = state.identity.delete_account(&auth.token).await {
        tracing::warn!(
            user_id = %auth.user.id,
            uid = %auth.user.uid,
            error = %e,
            "Identity provider account deletion failed - deleting local data anyway"
        );
    }

    state.store.delete_user(&auth.user.id).await?;

    tracing::info!(user_id = %auth.user.id, "Account deleted");

    Ok(Json(Envelope::new(MessageResponse {
        message: "Account deleted successfully".into(),
    })))
}
