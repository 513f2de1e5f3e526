// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring for one app instance.
//!
//! [`AppContext`] holds the validated config, the four services and the
//! optional generator, and hands out hooks and AI components bound to the
//! configured stand-in user.

use std::sync::Arc;
use std::time::Duration;

use pawmatch_config::PawmatchConfig;
use pawmatch_services::{PetFilter, Services};

use crate::ai::{ChatSession, DiscoveryInsight, SharedGenerator, StoryBook};
use crate::hooks::{
    ApplicationHook, ApplicationsHook, FavoritesHook, MessagesHook, PetHook, PetsHook,
};
use crate::navigation::Navigator;

#[derive(Clone)]
pub struct AppContext {
    config: Arc<PawmatchConfig>,
    services: Services,
    generator: SharedGenerator,
}

impl AppContext {
    pub fn new(config: PawmatchConfig, services: Services, generator: SharedGenerator) -> Self {
        Self {
            config: Arc::new(config),
            services,
            generator,
        }
    }

    pub fn config(&self) -> &PawmatchConfig {
        &self.config
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Whether AI features will reach a real generator.
    pub fn ai_enabled(&self) -> bool {
        self.generator.is_some()
    }

    fn user_id(&self) -> &str {
        &self.config.app.user_id
    }

    fn ai_deadline(&self) -> Duration {
        Duration::from_secs(self.config.ai.timeout_secs)
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new()
    }

    pub fn pets(&self, filter: Option<PetFilter>) -> PetsHook {
        PetsHook::new(self.services.pets.clone(), filter)
    }

    pub fn pet(&self, id: impl Into<String>) -> PetHook {
        PetHook::new(self.services.pets.clone(), id)
    }

    /// The stand-in user's applications.
    pub fn my_applications(&self) -> ApplicationsHook {
        ApplicationsHook::new(
            self.services.applications.clone(),
            Some(self.user_id().to_string()),
        )
    }

    pub fn application(&self, id: impl Into<String>) -> ApplicationHook {
        ApplicationHook::new(self.services.applications.clone(), id)
    }

    pub fn favorites(&self) -> FavoritesHook {
        FavoritesHook::new(self.services.favorites.clone(), self.user_id())
    }

    pub fn messages(&self) -> MessagesHook {
        MessagesHook::new(self.services.messages.clone(), self.user_id())
    }

    /// A chat session that persists both sides through `history`.
    pub fn chat(&self, history: Option<Arc<MessagesHook>>) -> ChatSession {
        let session = ChatSession::new(self.generator.clone(), &self.config.ai);
        match history {
            Some(history) => session.with_history(history),
            None => session,
        }
    }

    pub fn insight(&self) -> Arc<DiscoveryInsight> {
        Arc::new(DiscoveryInsight::new(
            self.generator.clone(),
            self.config.ai.insight_region.clone(),
            self.ai_deadline(),
        ))
    }

    pub fn stories(&self) -> StoryBook {
        StoryBook::new(self.generator.clone(), self.ai_deadline())
    }
}
