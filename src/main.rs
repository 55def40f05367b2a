use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use favorites_api::config::Config;
use favorites_api::middleware::auth::JwtSecret;
use favorites_api::routes;
use favorites_api::services::auth::AuthService;
use favorites_api::services::favorites::FavoriteService;
use favorites_api::store::favorites::InMemoryFavoriteStore;
use favorites_api::store::refresh::InMemoryRefreshTokenStore;
use favorites_api::store::users::{InMemoryUserStore, UserRepository};
use favorites_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserStore::new());
    let refresh_tokens = Arc::new(InMemoryRefreshTokenStore::new());
    let favorite_store = Arc::new(InMemoryFavoriteStore::new());

    let auth = Arc::new(AuthService::new(
        users.clone(),
        refresh_tokens,
        config.jwt_secret.clone(),
        config.access_token_ttl_seconds,
        config.refresh_token_ttl_days,
    ));
    let favorites = Arc::new(FavoriteService::new(favorite_store, users.clone()));

    seed_initial_users(users.as_ref())?;

    let state = AppState {
        users,
        auth,
        favorites,
    };

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(Any);

    let jwt_secret = JwtSecret(config.jwt_secret.clone());

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh_token))
        .route("/auth/logout", post(routes::auth::logout))
        // Users
        .route("/users/{user_id}", get(routes::users::get_user))
        // Favorites
        .route(
            "/users/{user_id}/favorites",
            get(routes::favorites::get_all).post(routes::favorites::create),
        )
        .route(
            "/users/{user_id}/favorites/{favorite_id}",
            get(routes::favorites::get_by_id)
                .put(routes::favorites::update)
                .patch(routes::favorites::patch)
                .delete(routes::favorites::delete),
        )
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("favorites API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Dev seed data. Stores are in-memory, so users exist only for this process.
/// Passwords come from env, falling back to dev defaults.
fn seed_initial_users(users: &dyn UserRepository) -> anyhow::Result<()> {
    let alice_password =
        std::env::var("SEED_ALICE_PASSWORD").unwrap_or_else(|_| "password1".into());
    let bob_password = std::env::var("SEED_BOB_PASSWORD").unwrap_or_else(|_| "password2".into());

    let alice = users.create("alice", &alice_password, vec!["user".into()])?;
    info!("seeded user alice ({})", alice.id);

    let bob = users.create("bob", &bob_password, vec!["user".into(), "admin".into()])?;
    info!("seeded user bob ({})", bob.id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use favorites_api::store::users::InMemoryUserStore;

    #[test]
    fn seed_passwords_come_from_env_with_defaults() {
        std::env::set_var("SEED_ALICE_PASSWORD", "from-env");
        std::env::remove_var("SEED_BOB_PASSWORD");

        let users = InMemoryUserStore::with_cost(4);
        seed_initial_users(&users).unwrap();

        let alice = users.get_by_username("alice").unwrap();
        assert!(bcrypt::verify("from-env", &alice.password_hash).unwrap());
        assert_eq!(alice.roles, vec!["user".to_string()]);

        let bob = users.get_by_username("bob").unwrap();
        assert!(bcrypt::verify("password2", &bob.password_hash).unwrap());
        assert!(bob.roles.contains(&"admin".to_string()));

        std::env::remove_var("SEED_ALICE_PASSWORD");
    }
}
