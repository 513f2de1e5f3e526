// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain services for PawMatch.
//!
//! Each service is scoped to one table, composes [`Gateway`] calls, attaches
//! related pets to applications and favorites, and labels failures with an
//! operation-specific message.

mod join;

pub mod applications;
pub mod favorites;
pub mod messages;
pub mod pets;

pub use applications::{ApplicationFilter, ApplicationForm, ApplicationService};
pub use favorites::{FavoriteService, FavoriteToggle};
pub use messages::{MessageService, DEFAULT_MESSAGE_LIMIT};
pub use pets::{PetFilter, PetService, DEFAULT_RECOMMENDED};

use pawmatch_store::Gateway;

/// All four services over one gateway.
#[derive(Clone)]
pub struct Services {
    pub pets: PetService,
    pub applications: ApplicationService,
    pub favorites: FavoriteService,
    pub messages: MessageService,
}

impl Services {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            pets: PetService::new(gateway.clone()),
            applications: ApplicationService::new(gateway.clone()),
            favorites: FavoriteService::new(gateway.clone()),
            messages: MessageService::new(gateway),
        }
    }
}
