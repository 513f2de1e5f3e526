// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use pawmatch_core::types::Favorite;
use pawmatch_services::{FavoriteService, FavoriteToggle};
use tokio::sync::{watch, Mutex};

use crate::resource::{MutationOutcome, Resource, ResourceCell};

/// A user's favorites.
pub struct FavoritesHook {
    service: FavoriteService,
    user_id: Mutex<String>,
    cell: ResourceCell<Vec<Favorite>>,
}

impl FavoritesHook {
    pub fn new(service: FavoriteService, user_id: impl Into<String>) -> Self {
        Self {
            service,
            user_id: Mutex::new(user_id.into()),
            cell: ResourceCell::new("favorites", Vec::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<Vec<Favorite>>> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> Resource<Vec<Favorite>> {
        self.cell.snapshot()
    }

    pub async fn mount(&self) {
        self.refetch().await;
    }

    pub async fn refetch(&self) {
        let user_id = self.user_id.lock().await.clone();
        if user_id.is_empty() {
            return;
        }
        self.cell
            .load(self.service.get_user_favorites(&user_id))
            .await;
    }

    pub async fn set_user(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        {
            let mut current = self.user_id.lock().await;
            if *current == user_id {
                return;
            }
            *current = user_id;
        }
        self.refetch().await;
    }

    /// Toggles a pet; `data` is whether it is a favorite afterwards.
    pub async fn toggle(&self, pet_id: &str) -> MutationOutcome<bool> {
        let user_id = self.user_id.lock().await.clone();
        match self.service.toggle_favorite(&user_id, pet_id).await {
            Ok(FavoriteToggle::Added(favorite)) => {
                self.cell.update(|list| {
                    list.retain(|f| f.pet_id() != favorite.pet_id());
                    list.insert(0, favorite);
                });
                MutationOutcome::ok(true)
            }
            Ok(FavoriteToggle::Removed) => {
                self.cell.update(|list| list.retain(|f| f.pet_id() != pet_id));
                MutationOutcome::ok(false)
            }
            Err(err) => MutationOutcome::failed(err),
        }
    }

    /// Local check against the loaded list; no store call.
    pub fn is_favorite(&self, pet_id: &str) -> bool {
        self.cell
            .snapshot()
            .data
            .iter()
            .any(|f| f.pet_id() == pet_id)
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}
