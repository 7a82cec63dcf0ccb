//! Favorites persisted as a JSON array of characters under one key.
//!
//! The in-memory mirror is updated before the write is attempted and is not
//! rolled back when the write fails. Mutations are serialized per store.

use std::{
    collections::HashSet,
    sync::{Arc, PoisonError, RwLock},
};

use shared::{
    domain::{Character, CharacterId},
    error::ErrorCode,
};
use storage::KeyValueStore;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::FavoritesError;

pub const FAVORITES_KEY: &str = "favorites";

pub struct FavoritesStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    mirror: RwLock<Vec<Character>>,
    write_gate: Mutex<()>,
}

impl FavoritesStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, FAVORITES_KEY)
    }

    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            mirror: RwLock::new(Vec::new()),
            write_gate: Mutex::new(()),
        }
    }

    /// Replaces the mirror with the persisted set. Absent or unparsable data
    /// loads as an empty set.
    pub async fn load(&self) -> Result<Vec<Character>, FavoritesError> {
        let _gate = self.write_gate.lock().await;
        let raw = self
            .kv
            .get(&self.key)
            .await
            .map_err(|source| FavoritesError::PersistenceReadFailed {
                key: self.key.clone(),
                source,
            })?;

        let favorites = match raw {
            None => Vec::new(),
            Some(raw) => match decode_favorites(&raw) {
                Ok(favorites) => favorites,
                Err(err) => {
                    warn!(
                        key = %self.key,
                        code = ?ErrorCode::PersistenceReadCorrupt,
                        error = %err,
                        "stored favorites are unreadable; starting empty"
                    );
                    Vec::new()
                }
            },
        };

        info!(key = %self.key, count = favorites.len(), "favorites loaded");
        self.replace_mirror(favorites.clone());
        Ok(favorites)
    }

    pub fn is_favorite(&self, character: &Character) -> bool {
        self.contains(character.id)
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.mirror
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|fav| fav.id == id)
    }

    pub fn favorites(&self) -> Vec<Character> {
        self.mirror
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes the character if it is a favorite, appends it otherwise, and
    /// waits for the full set to be written.
    pub async fn toggle(&self, character: &Character) -> Result<Vec<Character>, FavoritesError> {
        let _gate = self.write_gate.lock().await;
        let mut updated = self.favorites();
        let was_favorite = updated.iter().any(|fav| fav.id == character.id);
        if was_favorite {
            updated.retain(|fav| fav.id != character.id);
        } else {
            updated.push(character.clone());
        }

        info!(
            id = %character.id,
            favorite = !was_favorite,
            count = updated.len(),
            "favorite toggled"
        );
        self.commit(updated).await
    }

    /// Removes the favorite with `id`. An unknown id is a no-op with no write.
    pub async fn remove(&self, id: CharacterId) -> Result<Vec<Character>, FavoritesError> {
        let _gate = self.write_gate.lock().await;
        let mut updated = self.favorites();
        let before = updated.len();
        updated.retain(|fav| fav.id != id);
        if updated.len() == before {
            return Ok(updated);
        }

        info!(%id, count = updated.len(), "favorite removed");
        self.commit(updated).await
    }

    async fn commit(&self, updated: Vec<Character>) -> Result<Vec<Character>, FavoritesError> {
        self.replace_mirror(updated.clone());

        let encoded = serde_json::to_string(&updated).map_err(|err| {
            FavoritesError::PersistenceWriteFailed {
                key: self.key.clone(),
                source: err.into(),
            }
        })?;
        if let Err(source) = self.kv.set(&self.key, &encoded).await {
            warn!(key = %self.key, error = %source, "favorites write failed; keeping in-memory update");
            return Err(FavoritesError::PersistenceWriteFailed {
                key: self.key.clone(),
                source,
            });
        }

        Ok(updated)
    }

    fn replace_mirror(&self, favorites: Vec<Character>) {
        *self.mirror.write().unwrap_or_else(PoisonError::into_inner) = favorites;
    }
}

/// Parses a stored set, keeping the first entry for any repeated id.
fn decode_favorites(raw: &str) -> Result<Vec<Character>, serde_json::Error> {
    let stored: Vec<Character> = serde_json::from_str(raw)?;
    let mut seen = HashSet::new();
    Ok(stored
        .into_iter()
        .filter(|character| seen.insert(character.id))
        .collect())
}

#[cfg(test)]
#[path = "tests/favorites_tests.rs"]
mod tests;
