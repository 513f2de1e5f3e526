// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use pawmatch_core::types::Pet;
use pawmatch_services::{PetFilter, PetService};
use tokio::sync::{watch, Mutex};

use crate::resource::{Resource, ResourceCell};

/// Catalog list for an optional filter.
pub struct PetsHook {
    service: PetService,
    filter: Mutex<Option<PetFilter>>,
    cell: ResourceCell<Vec<Pet>>,
}

impl PetsHook {
    pub fn new(service: PetService, filter: Option<PetFilter>) -> Self {
        Self {
            service,
            filter: Mutex::new(filter),
            cell: ResourceCell::new("pets", Vec::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<Vec<Pet>>> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> Resource<Vec<Pet>> {
        self.cell.snapshot()
    }

    pub async fn mount(&self) {
        self.refetch().await;
    }

    pub async fn refetch(&self) {
        let filter = self.filter.lock().await.clone();
        self.cell
            .load(self.service.get_all_pets(filter.as_ref()))
            .await;
    }

    /// Replaces the filter, re-fetching only when it changed.
    pub async fn set_filter(&self, filter: Option<PetFilter>) {
        {
            let mut current = self.filter.lock().await;
            if *current == filter {
                return;
            }
            *current = filter;
        }
        self.refetch().await;
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}

/// One pet by id. A blank id shows nothing and fetches nothing.
pub struct PetHook {
    service: PetService,
    id: Mutex<String>,
    cell: ResourceCell<Option<Pet>>,
}

impl PetHook {
    pub fn new(service: PetService, id: impl Into<String>) -> Self {
        Self {
            service,
            id: Mutex::new(id.into()),
            cell: ResourceCell::new("pet", None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<Option<Pet>>> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> Resource<Option<Pet>> {
        self.cell.snapshot()
    }

    pub async fn mount(&self) {
        self.refetch().await;
    }

    pub async fn refetch(&self) {
        let id = self.id.lock().await.clone();
        if id.trim().is_empty() {
            return;
        }
        self.cell
            .load(async { self.service.get_pet_by_id(&id).await.map(Some) })
            .await;
    }

    pub async fn set_id(&self, id: impl Into<String>) {
        let id = id.into();
        {
            let mut current = self.id.lock().await;
            if *current == id {
                return;
            }
            *current = id;
        }
        self.cell.reset(None);
        self.refetch().await;
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}
