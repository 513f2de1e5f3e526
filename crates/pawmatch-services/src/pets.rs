// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pet catalog queries and the pet status workflow.

use pawmatch_core::query::{Direction, Filter, Query, Table};
use pawmatch_core::types::{Gender, NewPet, Pet, PetStatus, PetUpdate};
use pawmatch_core::{ApiError, ApiResult};
use pawmatch_store::Gateway;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Number of pets returned by [`PetService::get_recommended_pets`] by default.
pub const DEFAULT_RECOMMENDED: usize = 6;

/// Optional catalog filter. Set fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetFilter {
    pub status: Option<PetStatus>,
    /// Case-insensitive substring of the breed.
    pub breed: Option<String>,
    pub gender: Option<Gender>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Case-insensitive substring of name, breed or description.
    pub search: Option<String>,
    /// Pets must carry every listed tag.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PetFilter {
    /// Catalog query for this filter, newest first.
    ///
    /// Blank strings and an empty tag list are treated as unset.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new().order_by("created_at", Direction::Desc);

        if let Some(status) = self.status {
            query = query.eq("status", status.to_string());
        }
        if let Some(breed) = non_blank(&self.breed) {
            query = query.filter(Filter::substring("breed", breed));
        }
        if let Some(gender) = self.gender {
            query = query.eq("gender", gender.to_string());
        }
        if let Some(min) = self.min_price {
            query = query.gte("price", min);
        }
        if let Some(max) = self.max_price {
            query = query.lte("price", max);
        }
        if let Some(search) = non_blank(&self.search) {
            query = query.any(search_filters(search));
        }
        if !self.tags.is_empty() {
            query = query.contains("tags", self.tags.iter().cloned());
        }
        query
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn search_filters(term: &str) -> Vec<Filter> {
    ["name", "breed", "description"]
        .into_iter()
        .map(|column| Filter::substring(column, term))
        .collect()
}

/// Reads and writes the `pets` table.
#[derive(Clone)]
pub struct PetService {
    gateway: Gateway,
}

impl PetService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn get_all_pets(&self, filter: Option<&PetFilter>) -> ApiResult<Vec<Pet>> {
        let query = filter
            .map(PetFilter::to_query)
            .unwrap_or_else(|| Query::new().order_by("created_at", Direction::Desc));
        self.gateway
            .select(Table::Pets, query)
            .await
            .map_err(|e| e.relabel("failed to fetch pet list"))
    }

    pub async fn get_pet_by_id(&self, id: &str) -> ApiResult<Pet> {
        self.gateway
            .select_single(Table::Pets, Query::new().eq("id", id))
            .await
            .map_err(|e| e.relabel("failed to fetch pet details"))
    }

    pub async fn create_pet(&self, pet: &NewPet) -> ApiResult<Pet> {
        let created: Pet = self
            .gateway
            .insert(Table::Pets, pet)
            .await
            .map_err(|e| e.relabel("failed to create pet"))?;
        info!(pet_id = %created.id, name = %created.name, "pet created");
        Ok(created)
    }

    pub async fn update_pet(&self, id: &str, update: &PetUpdate) -> ApiResult<Pet> {
        self.gateway
            .update(Table::Pets, Query::new().eq("id", id), update)
            .await
            .map_err(|e| e.relabel("failed to update pet"))
    }

    pub async fn delete_pet(&self, id: &str) -> ApiResult<()> {
        self.gateway
            .delete(Table::Pets, Query::new().eq("id", id))
            .await
            .map_err(|e| e.relabel("failed to delete pet"))
    }

    /// Newest available pets.
    pub async fn get_recommended_pets(&self, limit: usize) -> ApiResult<Vec<Pet>> {
        let query = Query::new()
            .eq("status", PetStatus::Available.to_string())
            .order_by("created_at", Direction::Desc)
            .limit(limit);
        self.gateway
            .select(Table::Pets, query)
            .await
            .map_err(|e| e.relabel("failed to fetch recommended pets"))
    }

    /// Free-text search across name, breed and description.
    pub async fn search_pets(&self, term: &str) -> ApiResult<Vec<Pet>> {
        let query = Query::new()
            .any(search_filters(term.trim()))
            .order_by("created_at", Direction::Desc);
        self.gateway
            .select(Table::Pets, query)
            .await
            .map_err(|e| e.relabel("failed to search pets"))
    }

    /// Moves a pet one step forward in the adoption workflow.
    ///
    /// Re-applying the current status is a no-op; any other move that
    /// [`PetStatus::can_advance_to`] rejects is a validation error.
    pub async fn advance_status(&self, id: &str, next: PetStatus) -> ApiResult<Pet> {
        let pet = self.get_pet_by_id(id).await?;
        if pet.status == next {
            debug!(pet_id = id, status = %next, "pet already in requested status");
            return Ok(pet);
        }
        if !pet.status.can_advance_to(next) {
            return Err(ApiError::validation(format!(
                "pet {id} cannot move from {} to {next}",
                pet.status
            )));
        }
        let updated = self.update_pet(id, &PetUpdate::status(next)).await?;
        info!(pet_id = id, from = %pet.status, to = %next, "pet status advanced");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawmatch_core::query::Filter;
    use pawmatch_test_utils::{pet_row, MemoryStore, OpKind};
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::Arc;

    fn service(store: MemoryStore) -> (PetService, Arc<MemoryStore>) {
        let store = Arc::new(store);
        (PetService::new(Gateway::new(store.clone())), store)
    }

    fn catalog() -> MemoryStore {
        let mut luna = pet_row("p1", "Luna", "British Shorthair");
        luna["price"] = json!(80.0);
        luna["tags"] = json!(["calm", "vaccinated"]);
        let mut max = pet_row("p2", "Max", "Golden Retriever");
        max["gender"] = json!("male");
        max["price"] = json!(200.0);
        max["tags"] = json!(["active", "vaccinated"]);
        let mut milo = pet_row("p3", "Milo", "Shiba Inu");
        milo["gender"] = json!("male");
        milo["status"] = json!("under-review");
        milo["description"] = json!("Loves golden autumn walks.");
        MemoryStore::new().with_rows(Table::Pets, vec![luna, max, milo])
    }

    fn ids(pets: &[Pet]) -> Vec<&str> {
        pets.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_only_orders() {
        let q = PetFilter::default().to_query();
        assert!(q.filters.is_empty());
        assert!(q.order.is_some());
    }

    #[test]
    fn blank_strings_are_ignored() {
        let filter = PetFilter {
            breed: Some("  ".into()),
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(filter.to_query().filters.is_empty());
    }

    proptest! {
        #[test]
        fn search_is_one_or_group(term in "[a-z]{1,12}") {
            let filter = PetFilter { search: Some(term.clone()), ..Default::default() };
            let q = filter.to_query();
            prop_assert_eq!(q.filters.len(), 1);
            match &q.filters[0] {
                Filter::Any(nested) => prop_assert_eq!(nested.len(), 3),
                other => prop_assert!(false, "unexpected filter {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn all_pets_newest_first() {
        let (svc, _) = service(catalog());
        let pets = svc.get_all_pets(None).await.unwrap();
        assert_eq!(ids(&pets), vec!["p3", "p2", "p1"]);
    }

    #[tokio::test]
    async fn filters_combine_with_and() {
        let (svc, _) = service(catalog());
        let filter = PetFilter {
            gender: Some(Gender::Male),
            status: Some(PetStatus::Available),
            ..Default::default()
        };
        let pets = svc.get_all_pets(Some(&filter)).await.unwrap();
        assert_eq!(ids(&pets), vec!["p2"]);
    }

    #[tokio::test]
    async fn search_ors_across_columns() {
        let (svc, _) = service(catalog());
        // "golden" matches Max by breed and Milo by description.
        let filter = PetFilter {
            search: Some("GOLDEN".into()),
            ..Default::default()
        };
        let pets = svc.get_all_pets(Some(&filter)).await.unwrap();
        assert_eq!(ids(&pets), vec!["p3", "p2"]);
    }

    #[tokio::test]
    async fn price_bounds_are_inclusive_and_tags_contain_all() {
        let (svc, _) = service(catalog());
        let filter = PetFilter {
            min_price: Some(80.0),
            max_price: Some(200.0),
            tags: vec!["vaccinated".into()],
            ..Default::default()
        };
        let pets = svc.get_all_pets(Some(&filter)).await.unwrap();
        assert_eq!(ids(&pets), vec!["p2", "p1"]);

        let filter = PetFilter {
            tags: vec!["vaccinated".into(), "calm".into()],
            ..Default::default()
        };
        let pets = svc.get_all_pets(Some(&filter)).await.unwrap();
        assert_eq!(ids(&pets), vec!["p1"]);
    }

    #[tokio::test]
    async fn recommended_are_available_and_capped() {
        let (svc, _) = service(catalog());
        let pets = svc.get_recommended_pets(1).await.unwrap();
        assert_eq!(ids(&pets), vec!["p2"]);
    }

    #[tokio::test]
    async fn missing_pet_keeps_no_rows_code() {
        let (svc, _) = service(catalog());
        let err = svc.get_pet_by_id("nope").await.unwrap_err();
        assert_eq!(err.message, "failed to fetch pet details");
        assert!(err.is_no_rows());
    }

    #[tokio::test]
    async fn list_failure_has_operation_message() {
        let (svc, store) = service(catalog());
        store.fail_next(Table::Pets, Some(OpKind::Select), "timeout").await;
        let err = svc.get_all_pets(None).await.unwrap_err();
        assert_eq!(err.message, "failed to fetch pet list");
        assert_eq!(err.details.as_deref(), Some("timeout"));
    }

    #[tokio::test]
    async fn advance_status_follows_workflow() {
        let (svc, _) = service(catalog());
        let pet = svc.advance_status("p1", PetStatus::UnderReview).await.unwrap();
        assert_eq!(pet.status, PetStatus::UnderReview);
        let pet = svc.advance_status("p1", PetStatus::Approved).await.unwrap();
        assert_eq!(pet.status, PetStatus::Approved);

        let err = svc
            .advance_status("p2", PetStatus::Approved)
            .await
            .unwrap_err();
        assert_eq!(err.code.as_deref(), Some("validation"));
    }

    #[tokio::test]
    async fn update_and_delete() {
        let (svc, store) = service(catalog());
        let update = PetUpdate {
            price: Some(95.0),
            ..Default::default()
        };
        let pet = svc.update_pet("p1", &update).await.unwrap();
        assert_eq!(pet.price, 95.0);
        svc.delete_pet("p1").await.unwrap();
        assert!(store.row(Table::Pets, "p1").await.is_none());
    }
}
