use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    models::{
        auth::TokenResponse,
        user::{LoginRequest, RefreshTokenRequest},
    },
    services::auth::AuthError,
    AppState,
};

fn status_for(err: &AuthError) -> StatusCode {
    match err {
        AuthError::MissingToken => StatusCode::BAD_REQUEST,
        AuthError::TokenGeneration => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNAUTHORIZED,
    }
}

fn error_body(err: &AuthError) -> (StatusCode, Json<Value>) {
    (status_for(err), Json(json!({ "error": err.to_string() })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, (StatusCode, Json<Value>)> {
    state
        .auth
        .login(&body.username, &body.password)
        .map(Json)
        .map_err(|e| error_body(&e))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, (StatusCode, Json<Value>)> {
    state
        .auth
        .refresh(&body.refresh_token)
        .map(Json)
        .map_err(|e| error_body(&e))
}

pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    if body.refresh_token.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "missing refresh_token" })),
        ));
    }

    state.auth.logout(&body.refresh_token);
    Ok(StatusCode::NO_CONTENT)
}
