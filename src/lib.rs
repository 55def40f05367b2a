pub mod config;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use services::auth::AuthService;
use services::favorites::FavoriteService;
use store::users::UserRepository;

/// Application state shared across all handlers. Stores are process-wide
/// singletons built at startup and handed to the services by reference.
/// The JWT secret travels separately, via the `JwtSecret` extension.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub auth: Arc<AuthService>,
    pub favorites: Arc<FavoriteService>,
}
