use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    models::{
        auth::AuthenticatedUser,
        favorite::{CreateFavoriteRequest, Favorite, PatchFavoriteRequest, UpdateFavoriteRequest},
    },
    services::favorites::FavoriteError,
    AppState,
};

fn error_body(err: &FavoriteError) -> (StatusCode, Json<Value>) {
    let status = match err {
        FavoriteError::NotFound | FavoriteError::UserNotFound => StatusCode::NOT_FOUND,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

/// The path user must match the token subject — users cannot reach another
/// user's favorites.
fn check_owner(
    user: &AuthenticatedUser,
    path_user_id: Uuid,
) -> Result<(), (StatusCode, Json<Value>)> {
    if user.user_id != path_user_id {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "cannot access another user's data" })),
        ));
    }
    Ok(())
}

pub async fn get_all(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Favorite>>, (StatusCode, Json<Value>)> {
    check_owner(&user, user_id)?;
    Ok(Json(state.favorites.get_all(user_id)))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((user_id, favorite_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Favorite>, (StatusCode, Json<Value>)> {
    check_owner(&user, user_id)?;
    state
        .favorites
        .get(user_id, favorite_id)
        .map(Json)
        .ok_or_else(|| error_body(&FavoriteError::NotFound))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(user_id): Path<Uuid>,
    Json(body): Json<CreateFavoriteRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    check_owner(&user, user_id)?;
    state
        .favorites
        .create(user_id, body)
        .map(|fav| (StatusCode::CREATED, Json(json!({ "id": fav.id }))))
        .map_err(|e| error_body(&e))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((user_id, favorite_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateFavoriteRequest>,
) -> Result<Json<Favorite>, (StatusCode, Json<Value>)> {
    check_owner(&user, user_id)?;
    state
        .favorites
        .update(user_id, favorite_id, body)
        .map(Json)
        .map_err(|e| error_body(&e))
}

pub async fn patch(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((user_id, favorite_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<PatchFavoriteRequest>,
) -> Result<Json<Favorite>, (StatusCode, Json<Value>)> {
    check_owner(&user, user_id)?;
    state
        .favorites
        .patch(user_id, favorite_id, body)
        .map(Json)
        .map_err(|e| error_body(&e))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((user_id, favorite_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    check_owner(&user, user_id)?;
    state
        .favorites
        .delete(user_id, favorite_id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| error_body(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::favorite::AssetType;
    use crate::services::auth::AuthService;
    use crate::services::favorites::FavoriteService;
    use crate::store::favorites::InMemoryFavoriteStore;
    use crate::store::refresh::InMemoryRefreshTokenStore;
    use crate::store::users::{InMemoryUserStore, UserRepository};
    use serde_json::json;
    use std::sync::Arc;

    fn fixture() -> (AppState, Arc<InMemoryUserStore>) {
        let users = Arc::new(InMemoryUserStore::with_cost(4));
        let refresh_tokens = Arc::new(InMemoryRefreshTokenStore::new());
        let favorite_store = Arc::new(InMemoryFavoriteStore::new());
        let auth = Arc::new(AuthService::new(
            users.clone(),
            refresh_tokens,
            "test-secret-key-12345".into(),
            900,
            7,
        ));
        let favorites = Arc::new(FavoriteService::new(favorite_store, users.clone()));
        let state = AppState {
            users: users.clone(),
            auth,
            favorites,
        };
        (state, users)
    }

    fn authed(user_id: Uuid) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id,
            roles: vec!["user".into()],
        }
    }

    #[tokio::test]
    async fn cross_user_request_is_forbidden() {
        let (state, _users) = fixture();
        let token_user = Uuid::new_v4();
        let path_user = Uuid::new_v4();

        let (status, _) = get_all(State(state.clone()), authed(token_user), Path(path_user))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = create(
            State(state),
            authed(token_user),
            Path(path_user),
            Json(CreateFavoriteRequest {
                kind: AssetType::Chart,
                description: "weekly usage".into(),
                data: json!({}),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn owner_reaches_their_own_favorites() {
        let (state, users) = fixture();
        let user = users.create("alice", "pw1", vec!["user".into()]).unwrap();

        let (status, body) = create(
            State(state.clone()),
            authed(user.id),
            Path(user.id),
            Json(CreateFavoriteRequest {
                kind: AssetType::Insight,
                description: "churn drivers".into(),
                data: json!({ "q": 3 }),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(body.0.get("id").is_some());

        let list = get_all(State(state), authed(user.id), Path(user.id))
            .await
            .unwrap();
        assert_eq!(list.0.len(), 1);
    }
}
