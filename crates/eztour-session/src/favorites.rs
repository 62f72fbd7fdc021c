//! In-memory favorites view kept in lockstep with durable storage.
//!
//! Every mutation is written through to the repository and followed by a
//! full reload. Repository errors are logged and swallowed; on failure the
//! view keeps whatever it held before the operation.

use eztour_core::{Candidate, FavoriteEntity};
use eztour_db::FavoriteRepository;

pub struct FavoritesStore<R> {
    repository: R,
    favorites: Vec<FavoriteEntity>,
}

impl<R: FavoriteRepository> FavoritesStore<R> {
    /// Creates a store with an empty view; call [`FavoritesStore::reload`]
    /// or use [`FavoritesStore::load`] to populate it.
    #[must_use]
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            favorites: Vec::new(),
        }
    }

    pub async fn load(repository: R) -> Self {
        let mut store = Self::new(repository);
        store.reload().await;
        store
    }

    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f.id == id)
    }

    #[must_use]
    pub fn favorites(&self) -> Vec<Candidate> {
        self.favorites.iter().map(FavoriteEntity::to_candidate).collect()
    }

    #[must_use]
    pub fn entities(&self) -> &[FavoriteEntity] {
        &self.favorites
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Saves `candidate` as a favorite. Returns `true` when both the write and
    /// the reload succeeded.
    pub async fn add(&mut self, candidate: &Candidate) -> bool {
        let entity = FavoriteEntity::from_candidate(candidate);
        if let Err(e) = self.repository.insert(&entity).await {
            tracing::warn!(id = %entity.id, error = %e, "failed to save favorite");
            return false;
        }
        self.reload().await
    }

    /// Removes the favorite with `id`; an unknown id is a no-op. Returns
    /// `true` when both the delete and the reload succeeded.
    pub async fn remove(&mut self, id: &str) -> bool {
        if let Err(e) = self.repository.delete_by_id(id).await {
            tracing::warn!(id, error = %e, "failed to remove favorite");
            return false;
        }
        self.reload().await
    }

    /// Adds the candidate if it is not a favorite, removes it otherwise.
    /// Returns whether it is a favorite afterwards.
    pub async fn toggle(&mut self, candidate: &Candidate) -> bool {
        if self.is_favorite(&candidate.id) {
            self.remove(&candidate.id).await;
        } else {
            self.add(candidate).await;
        }
        self.is_favorite(&candidate.id)
    }

    /// Replaces the view with the repository's contents. Returns `false` and
    /// keeps the current view if the fetch fails.
    pub async fn reload(&mut self) -> bool {
        match self.repository.fetch_all().await {
            Ok(favorites) => {
                tracing::debug!(count = favorites.len(), "favorites reloaded");
                self.favorites = favorites;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to reload favorites");
                false
            }
        }
    }
}
