use std::collections::HashMap;
use std::sync::RwLock;

use bcrypt::DEFAULT_COST;
use uuid::Uuid;

use crate::models::user::User;

#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("username already exists")]
    DuplicateUser,
    #[error("failed to hash password")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Credential store contract. Exactly one in-memory implementation exists;
/// a durable backend would satisfy the same trait.
pub trait UserRepository: Send + Sync {
    fn get_by_username(&self, username: &str) -> Option<User>;
    fn get_by_id(&self, id: Uuid) -> Option<User>;
    fn create(
        &self,
        username: &str,
        plain_password: &str,
        roles: Vec<String>,
    ) -> Result<User, UserStoreError>;
}

/// In-memory user store, keyed by username. Lives for the process lifetime;
/// nothing survives a restart.
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
    bcrypt_cost: u32,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::with_cost(DEFAULT_COST)
    }

    /// Lower-cost variant for tests, where hashing dominates runtime.
    pub fn with_cost(bcrypt_cost: u32) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            bcrypt_cost,
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for InMemoryUserStore {
    fn get_by_username(&self, username: &str) -> Option<User> {
        self.users.read().unwrap().get(username).cloned()
    }

    fn get_by_id(&self, id: Uuid) -> Option<User> {
        self.users
            .read()
            .unwrap()
            .values()
            .find(|u| u.id == id)
            .cloned()
    }

    fn create(
        &self,
        username: &str,
        plain_password: &str,
        roles: Vec<String>,
    ) -> Result<User, UserStoreError> {
        // Hash outside the lock; bcrypt is slow by design.
        let password_hash = bcrypt::hash(plain_password, self.bcrypt_cost)?;

        let mut users = self.users.write().unwrap();
        if users.contains_key(username) {
            return Err(UserStoreError::DuplicateUser);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
            roles,
        };
        users.insert(username.to_string(), user.clone());
        Ok(user)
    }
}
