// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt text and the fixed strings shown in place of generated text.

use pawmatch_config::model::AiConfig;
use pawmatch_core::types::Pet;

pub const GREETING: &str = "Hi! I'm your AI adoption assistant. Tell me about your home, \
your daily rhythm and what you hope for in a companion, and I'll suggest the best furry \
match for you!";

/// Shown when the generator answers with blank text.
pub const DRIFTED_OFF: &str = "Sorry, I drifted off for a moment. Could you say that again?";

/// Shown when the generator fails, times out, or is not configured.
pub const CONNECTION_FAILED: &str =
    "Couldn't reach the server. Please check your network connection.";

pub const STORY_UNAVAILABLE: &str = "Can't write a story right now, please try again later.";

pub const STORY_FAILED: &str = "Oops, the AI is taking a nap. Please try again in a moment.";

/// Limits applied when embedding the catalog in a chat prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLimits {
    pub max_pets: usize,
    pub description_chars: usize,
}

impl From<&AiConfig> for CatalogLimits {
    fn from(config: &AiConfig) -> Self {
        Self {
            max_pets: config.catalog_limit,
            description_chars: config.description_chars,
        }
    }
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self::from(&AiConfig::default())
    }
}

/// Cuts `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// One line per pet: `- name: breed, age, personality: description`.
pub fn catalog_snapshot(pets: &[Pet], limits: CatalogLimits) -> String {
    pets.iter()
        .take(limits.max_pets)
        .map(|p| {
            format!(
                "- {}: {}, {}, personality: {}",
                p.name,
                p.breed,
                p.age,
                truncate_chars(&p.description, limits.description_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Matchmaking prompt. `user_text` is embedded verbatim.
pub fn chat_prompt(pets: &[Pet], user_text: &str, limits: CatalogLimits) -> String {
    format!(
        "You are a professional pet adoption assistant. These pets are currently \
waiting for a home:\n{catalog}\n\n\
The user said: \"{user_text}\"\n\n\
Reply in a warm, professional tone. If the user mentions lifestyle habits, recommend \
the single most suitable pet from the list above by name and explain why. If none fits, \
offer gentle, caring advice instead. Keep the reply brief.",
        catalog = catalog_snapshot(pets, limits),
    )
}

/// Short adoption story for one pet.
pub fn story_prompt(pet: &Pet) -> String {
    format!(
        "Write a short, touching story about a {breed} named {name}. It is {age} old. \
Personality: {description}. The story should be heartwarming and encourage people to \
adopt it. Keep it under 150 words.",
        breed = pet.breed,
        name = pet.name,
        age = pet.age,
        description = pet.description,
    )
}

/// Grounded request for local adoption news from `year` and the year before.
pub fn insight_prompt(region: &str, year: i32) -> String {
    format!(
        "Provide the latest news about pet adoption events or stray animal welfare \
in the {region} area for {since}-{year}. Give a short summary.",
        since = year - 1,
    )
}
