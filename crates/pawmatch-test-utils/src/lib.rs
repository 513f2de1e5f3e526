// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for PawMatch.
//!
//! Provides an in-memory record store and a scripted generator so the
//! service, hook, and AI layers can be exercised without a network.

pub mod memory_store;
pub mod mock_generator;

pub use memory_store::{MemoryStore, OpKind};
pub use mock_generator::MockGenerator;

use serde_json::{json, Value};

/// A complete pet row with sensible defaults, for seeding stores.
pub fn pet_row(id: &str, name: &str, breed: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "breed": breed,
        "age": "2 years",
        "gender": "female",
        "weight": "4.2 kg",
        "distance": "1.2 km",
        "location": "Shanghai",
        "image": format!("https://images.example.com/{id}.jpg"),
        "tags": ["friendly"],
        "description": format!("{name} is a gentle {breed} looking for a home."),
        "status": "available",
        "price": 100.0,
    })
}
