use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    models::{auth::AuthenticatedUser, user::UserProfile},
    AppState,
};

/// Users can read their own profile; admins can read anyone's.
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfile>, (StatusCode, Json<Value>)> {
    if user.user_id != user_id && !user.has_role("admin") {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "cannot access another user's data" })),
        ));
    }

    state
        .users
        .get_by_id(user_id)
        .map(|u| Json(UserProfile::from(u)))
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "user not found" })),
        ))
}
