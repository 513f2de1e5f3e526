// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user favorite pets.

use pawmatch_core::query::{Direction, Query, Table};
use pawmatch_core::types::{Favorite, FavoriteRecord, NewFavorite};
use pawmatch_core::ApiResult;
use pawmatch_store::Gateway;
use tracing::{debug, info};

use crate::join::{attach, pets_by_id};

/// Result of [`FavoriteService::toggle_favorite`].
#[derive(Debug, Clone, PartialEq)]
pub enum FavoriteToggle {
    Added(Favorite),
    Removed,
}

impl FavoriteToggle {
    pub fn is_added(&self) -> bool {
        matches!(self, FavoriteToggle::Added(_))
    }
}

/// Reads and writes the `favorites` table.
#[derive(Clone)]
pub struct FavoriteService {
    gateway: Gateway,
}

impl FavoriteService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    fn pair(user_id: &str, pet_id: &str) -> Query {
        Query::new().eq("user_id", user_id).eq("pet_id", pet_id)
    }

    /// The user's favorites, newest first, each with its pet attached.
    pub async fn get_user_favorites(&self, user_id: &str) -> ApiResult<Vec<Favorite>> {
        let records: Vec<FavoriteRecord> = self
            .gateway
            .select(
                Table::Favorites,
                Query::new()
                    .eq("user_id", user_id)
                    .order_by("created_at", Direction::Desc),
            )
            .await
            .map_err(|e| e.relabel("failed to fetch favorites"))?;

        let pets = pets_by_id(&self.gateway, records.iter().map(|r| r.pet_id.as_str())).await;
        Ok(records
            .into_iter()
            .map(|record| {
                let pet = attach(&pets, &record.pet_id, &record.id);
                Favorite { record, pet }
            })
            .collect())
    }

    /// Adds a favorite.
    ///
    /// A unique-constraint conflict means the pair already exists; the stored
    /// row is returned instead of an error.
    pub async fn add_favorite(&self, user_id: &str, pet_id: &str) -> ApiResult<Favorite> {
        let body = NewFavorite {
            user_id: user_id.to_string(),
            pet_id: pet_id.to_string(),
        };
        let record: FavoriteRecord = match self.gateway.insert(Table::Favorites, &body).await {
            Ok(record) => record,
            Err(err) if err.is_unique_violation() => {
                debug!(user_id, pet_id, "favorite already exists, reading stored row");
                self.gateway
                    .select_single(Table::Favorites, Self::pair(user_id, pet_id).limit(1))
                    .await
                    .map_err(|e| e.relabel("failed to add favorite"))?
            }
            Err(err) => return Err(err.relabel("failed to add favorite")),
        };

        let pets = pets_by_id(&self.gateway, [record.pet_id.as_str()]).await;
        let pet = attach(&pets, &record.pet_id, &record.id);
        Ok(Favorite { record, pet })
    }

    /// Deletes every favorite row for the pair.
    pub async fn remove_favorite(&self, user_id: &str, pet_id: &str) -> ApiResult<()> {
        self.gateway
            .delete(Table::Favorites, Self::pair(user_id, pet_id))
            .await
            .map_err(|e| e.relabel("failed to remove favorite"))
    }

    /// Existence check; the no-rows code means `false`.
    pub async fn is_favorite(&self, user_id: &str, pet_id: &str) -> ApiResult<bool> {
        match self
            .gateway
            .select_single::<FavoriteRecord>(Table::Favorites, Self::pair(user_id, pet_id).limit(1))
            .await
        {
            Ok(_) => Ok(true),
            Err(err) if err.is_no_rows() => Ok(false),
            Err(err) => Err(err.relabel("failed to check favorite status")),
        }
    }

    /// Removes the favorite if present, otherwise adds it.
    ///
    /// Check-then-act; concurrent toggles are reconciled by the unique
    /// constraint path in [`FavoriteService::add_favorite`].
    pub async fn toggle_favorite(&self, user_id: &str, pet_id: &str) -> ApiResult<FavoriteToggle> {
        let present = self
            .is_favorite(user_id, pet_id)
            .await
            .map_err(|e| e.relabel("failed to toggle favorite"))?;

        if present {
            self.remove_favorite(user_id, pet_id)
                .await
                .map_err(|e| e.relabel("failed to toggle favorite"))?;
            info!(user_id, pet_id, "favorite removed");
            Ok(FavoriteToggle::Removed)
        } else {
            let favorite = self
                .add_favorite(user_id, pet_id)
                .await
                .map_err(|e| e.relabel("failed to toggle favorite"))?;
            info!(user_id, pet_id, "favorite added");
            Ok(FavoriteToggle::Added(favorite))
        }
    }
}
