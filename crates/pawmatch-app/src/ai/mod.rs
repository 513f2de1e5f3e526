// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI orchestration: matchmaking chat, discovery news, and pet stories.
//!
//! Every feature degrades to a fixed user-facing string when the generator
//! is missing, slow, or failing. Nothing here returns an error to the caller.

pub mod chat;
pub mod insight;
pub mod prompt;
pub mod story;

pub use chat::{ChatEntry, ChatSession, ChatState, SendOutcome};
pub use insight::{DiscoveryInsight, InsightState};
pub use story::{StoryBook, StoryState};

use std::sync::Arc;
use std::time::Duration;

use pawmatch_core::types::{Generation, GenerationRequest};
use pawmatch_core::{GenerationAdapter, PawError};

/// Shared handle to the generation adapter; `None` when no API key is set.
pub type SharedGenerator = Option<Arc<dyn GenerationAdapter>>;

/// One generation call under `deadline`.
pub(crate) async fn generate_within(
    generator: &SharedGenerator,
    request: GenerationRequest,
    deadline: Duration,
) -> Result<Generation, PawError> {
    let Some(generator) = generator else {
        return Err(PawError::Config("no Gemini API key configured".into()));
    };
    tokio::time::timeout(deadline, generator.generate(request))
        .await
        .map_err(|_| PawError::Timeout { duration: deadline })?
}
