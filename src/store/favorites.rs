use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::models::favorite::Favorite;

/// Favorites storage contract, scoped per user.
pub trait FavoriteRepository: Send + Sync {
    fn get(&self, user_id: Uuid, favorite_id: Uuid) -> Option<Favorite>;
    fn get_all(&self, user_id: Uuid) -> Vec<Favorite>;
    fn add(&self, user_id: Uuid, favorite: Favorite);
    fn update(&self, user_id: Uuid, favorite: Favorite);
    /// Returns false when the favorite did not exist.
    fn delete(&self, user_id: Uuid, favorite_id: Uuid) -> bool;
}

pub struct InMemoryFavoriteStore {
    favorites: RwLock<HashMap<Uuid, HashMap<Uuid, Favorite>>>,
}

impl InMemoryFavoriteStore {
    pub fn new() -> Self {
        Self {
            favorites: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryFavoriteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoriteRepository for InMemoryFavoriteStore {
    fn get(&self, user_id: Uuid, favorite_id: Uuid) -> Option<Favorite> {
        self.favorites
            .read()
            .unwrap()
            .get(&user_id)
            .and_then(|m| m.get(&favorite_id))
            .cloned()
    }

    fn get_all(&self, user_id: Uuid) -> Vec<Favorite> {
        self.favorites
            .read()
            .unwrap()
            .get(&user_id)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    fn add(&self, user_id: Uuid, favorite: Favorite) {
        self.favorites
            .write()
            .unwrap()
            .entry(user_id)
            .or_default()
            .insert(favorite.id, favorite);
    }

    fn update(&self, user_id: Uuid, favorite: Favorite) {
        self.favorites
            .write()
            .unwrap()
            .entry(user_id)
            .or_default()
            .insert(favorite.id, favorite);
    }

    fn delete(&self, user_id: Uuid, favorite_id: Uuid) -> bool {
        self.favorites
            .write()
            .unwrap()
            .get_mut(&user_id)
            .map(|m| m.remove(&favorite_id).is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::favorite::AssetType;
    use chrono::Utc;
    use serde_json::json;

    fn favorite() -> Favorite {
        Favorite {
            id: Uuid::new_v4(),
            kind: AssetType::Chart,
            description: "weekly usage".into(),
            data: json!({ "metric": "dau" }),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn add_and_get() {
        let store = InMemoryFavoriteStore::new();
        let user_id = Uuid::new_v4();
        let fav = favorite();

        store.add(user_id, fav.clone());

        let got = store.get(user_id, fav.id).unwrap();
        assert_eq!(got.description, "weekly usage");
        assert_eq!(store.get_all(user_id).len(), 1);
    }

    #[test]
    fn favorites_are_scoped_per_user() {
        let store = InMemoryFavoriteStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let fav = favorite();

        store.add(alice, fav.clone());

        assert!(store.get(bob, fav.id).is_none());
        assert!(store.get_all(bob).is_empty());
    }

    #[test]
    fn delete_reports_missing() {
        let store = InMemoryFavoriteStore::new();
        let user_id = Uuid::new_v4();
        let fav = favorite();

        assert!(!store.delete(user_id, fav.id));
        store.add(user_id, fav.clone());
        assert!(store.delete(user_id, fav.id));
        assert!(!store.delete(user_id, fav.id));
    }
}
