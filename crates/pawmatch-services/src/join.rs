// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch lookup of the pets referenced by applications and favorites.

use std::collections::{BTreeSet, HashMap};

use pawmatch_core::query::{Query, Table};
use pawmatch_core::types::Pet;
use pawmatch_store::Gateway;
use tracing::warn;

/// Pets keyed by id, fetched with one `in` query over the distinct ids.
///
/// A failed lookup yields an empty map; callers attach `None` and log.
pub(crate) async fn pets_by_id<'a>(
    gateway: &Gateway,
    ids: impl IntoIterator<Item = &'a str>,
) -> HashMap<String, Pet> {
    let distinct: BTreeSet<&str> = ids.into_iter().collect();
    if distinct.is_empty() {
        return HashMap::new();
    }

    let query = Query::new().in_list("id", distinct.iter().copied());
    match gateway.select::<Pet>(Table::Pets, query).await {
        Ok(pets) => pets.into_iter().map(|p| (p.id.clone(), p)).collect(),
        Err(err) => {
            warn!(
                count = distinct.len(),
                error = %err,
                details = err.details.as_deref().unwrap_or(""),
                "pet lookup failed, rows returned without pets"
            );
            HashMap::new()
        }
    }
}

/// Takes the pet for `pet_id` out of the map, warning when it is absent.
pub(crate) fn attach(pets: &HashMap<String, Pet>, pet_id: &str, owner: &str) -> Option<Pet> {
    let pet = pets.get(pet_id).cloned();
    if pet.is_none() {
        warn!(pet_id, owner, "referenced pet not found");
    }
    pet
}
