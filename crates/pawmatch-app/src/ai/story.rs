// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-demand adoption stories, one per pet.

use std::collections::HashMap;
use std::time::Duration;

use pawmatch_core::types::{GenerationRequest, Pet};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::ai::prompt::{story_prompt, STORY_FAILED, STORY_UNAVAILABLE};
use crate::ai::{generate_within, SharedGenerator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryState {
    Generating,
    Ready(String),
}

pub struct StoryBook {
    generator: SharedGenerator,
    deadline: Duration,
    stories: watch::Sender<HashMap<String, StoryState>>,
}

impl StoryBook {
    pub fn new(generator: SharedGenerator, deadline: Duration) -> Self {
        Self {
            generator,
            deadline,
            stories: watch::channel(HashMap::new()).0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<HashMap<String, StoryState>> {
        self.stories.subscribe()
    }

    pub fn story(&self, pet_id: &str) -> Option<StoryState> {
        self.stories.borrow().get(pet_id).cloned()
    }

    /// Writes (or rewrites) the story for `pet`.
    ///
    /// Returns the text now shown, which is a fixed apology when generation
    /// fails. Returns `None` if a story for this pet is already generating.
    pub async fn generate(&self, pet: &Pet) -> Option<String> {
        let started = self.stories.send_if_modified(|stories| {
            if stories.get(&pet.id) == Some(&StoryState::Generating) {
                return false;
            }
            stories.insert(pet.id.clone(), StoryState::Generating);
            true
        });
        if !started {
            debug!(pet_id = %pet.id, "story already generating");
            return None;
        }

        let request = GenerationRequest::text(story_prompt(pet));
        let text = match generate_within(&self.generator, request, self.deadline).await {
            Ok(generation) => generation
                .non_blank_text()
                .unwrap_or(STORY_UNAVAILABLE)
                .to_string(),
            Err(err) => {
                warn!(pet_id = %pet.id, error = %err, "story generation failed");
                STORY_FAILED.to_string()
            }
        };
        self.stories.send_modify(|stories| {
            stories.insert(pet.id.clone(), StoryState::Ready(text.clone()));
        });
        Some(text)
    }
}
