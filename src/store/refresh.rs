use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::auth::RefreshRecord;

/// Refresh token store contract. Each call is atomic in isolation; no locking
/// spans a read-then-write sequence, so concurrent rotations of the same token
/// resolve to first-wins.
pub trait RefreshTokenRepository: Send + Sync {
    /// Upserts the record under the opaque token string.
    fn save(&self, token: &str, record: RefreshRecord);
    fn get(&self, token: &str) -> Option<RefreshRecord>;
    /// Idempotent; deleting an absent token is a no-op.
    fn delete(&self, token: &str);
}

pub struct InMemoryRefreshTokenStore {
    tokens: RwLock<HashMap<String, RefreshRecord>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryRefreshTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshTokenRepository for InMemoryRefreshTokenStore {
    fn save(&self, token: &str, record: RefreshRecord) {
        self.tokens.write().unwrap().insert(token.to_string(), record);
    }

    fn get(&self, token: &str) -> Option<RefreshRecord> {
        self.tokens.read().unwrap().get(token).cloned()
    }

    fn delete(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }
}
