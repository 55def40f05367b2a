use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::models::favorite::{
    CreateFavoriteRequest, Favorite, PatchFavoriteRequest, UpdateFavoriteRequest,
};
use crate::store::favorites::FavoriteRepository;
use crate::store::users::UserRepository;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FavoriteError {
    #[error("favorite not found")]
    NotFound,
    #[error("user not found")]
    UserNotFound,
}

/// CRUD over per-user favorites. Plain data-access plumbing; all interesting
/// state lives in the store.
pub struct FavoriteService {
    favorites: Arc<dyn FavoriteRepository>,
    users: Arc<dyn UserRepository>,
}

impl FavoriteService {
    pub fn new(favorites: Arc<dyn FavoriteRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { favorites, users }
    }

    pub fn get_all(&self, user_id: Uuid) -> Vec<Favorite> {
        self.favorites.get_all(user_id)
    }

    pub fn get(&self, user_id: Uuid, favorite_id: Uuid) -> Option<Favorite> {
        self.favorites.get(user_id, favorite_id)
    }

    pub fn create(
        &self,
        user_id: Uuid,
        req: CreateFavoriteRequest,
    ) -> Result<Favorite, FavoriteError> {
        if self.users.get_by_id(user_id).is_none() {
            return Err(FavoriteError::UserNotFound);
        }

        let now = Utc::now();
        let favorite = Favorite {
            id: Uuid::new_v4(),
            kind: req.kind,
            description: req.description,
            data: req.data,
            created_at: now,
            updated_at: now,
        };
        self.favorites.add(user_id, favorite.clone());
        Ok(favorite)
    }

    pub fn update(
        &self,
        user_id: Uuid,
        favorite_id: Uuid,
        req: UpdateFavoriteRequest,
    ) -> Result<Favorite, FavoriteError> {
        let existing = self
            .favorites
            .get(user_id, favorite_id)
            .ok_or(FavoriteError::NotFound)?;

        let favorite = Favorite {
            id: favorite_id,
            kind: req.kind,
            description: req.description,
            data: req.data,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.favorites.update(user_id, favorite.clone());
        Ok(favorite)
    }

    pub fn patch(
        &self,
        user_id: Uuid,
        favorite_id: Uuid,
        req: PatchFavoriteRequest,
    ) -> Result<Favorite, FavoriteError> {
        let mut favorite = self
            .favorites
            .get(user_id, favorite_id)
            .ok_or(FavoriteError::NotFound)?;

        if let Some(kind) = req.kind {
            favorite.kind = kind;
        }
        if let Some(description) = req.description {
            favorite.description = description;
        }
        if let Some(data) = req.data {
            favorite.data = data;
        }
        favorite.updated_at = Utc::now();

        self.favorites.update(user_id, favorite.clone());
        Ok(favorite)
    }

    pub fn delete(&self, user_id: Uuid, favorite_id: Uuid) -> Result<(), FavoriteError> {
        if self.favorites.delete(user_id, favorite_id) {
            Ok(())
        } else {
            Err(FavoriteError::NotFound)
        }
    }
}
