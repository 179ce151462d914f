//! Axum route handlers for the profile API.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::profile::MyProfile;
use crate::profile::form::read_profile_form;
use crate::profile::service::{get_my_profile, update_my_profile};
use crate::state::AppState;

/// GET {base}/myProfile
pub async fn handle_get_my_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MyProfile>, AppError> {
    let profile = get_my_profile(state.upstream.as_ref(), &user).await?;
    Ok(Json(profile))
}

/// PUT {base}/myProfile (multipart/form-data)
pub async fn handle_update_my_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    multipart: Multipart,
) -> Result<Json<MyProfile>, AppError> {
    let update = read_profile_form(multipart).await?;
    let profile = update_my_profile(state.upstream.as_ref(), &user, &update).await?;
    Ok(Json(profile))
}
