// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-entity state hooks.
//!
//! A hook owns a [`ResourceCell`](crate::resource::ResourceCell) and the
//! parameters that identify what it shows. `mount()` runs the first fetch,
//! changing a parameter re-fetches, and mutators splice the local list
//! instead of re-fetching.

mod applications;
mod favorites;
mod messages;
mod pets;

pub use applications::{ApplicationHook, ApplicationsHook};
pub use favorites::FavoritesHook;
pub use messages::MessagesHook;
pub use pets::{PetHook, PetsHook};
