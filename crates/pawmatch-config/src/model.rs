// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for PawMatch.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level PawMatch configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// Store secrets have no usable default; validation rejects a config without them.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PawmatchConfig {
    /// Stand-in user identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Hosted relational store connection.
    #[serde(default)]
    pub store: StoreConfig,

    /// Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Prompt construction and AI feature settings.
    #[serde(default)]
    pub ai: AiConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Identifier used in place of a signed-in user.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            log_level: default_log_level(),
        }
    }
}

fn default_user_id() -> String {
    "user@example.com".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Relational store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Project endpoint URL, e.g. `https://xyz.supabase.co`. Required.
    #[serde(default)]
    pub url: Option<String>,

    /// Anonymous access key sent as `apikey` and bearer token. Required.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request deadline in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` falls back to `GEMINI_API_KEY`; AI features are
    /// disabled if neither is set.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for chat, stories and insights.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL, without the `/models/...` suffix.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_gemini_base_url(),
        }
    }
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// AI orchestration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AiConfig {
    /// Maximum number of pets embedded in a chat prompt.
    #[serde(default = "default_catalog_limit")]
    pub catalog_limit: usize,

    /// Pet descriptions are cut to this many characters in prompts.
    #[serde(default = "default_description_chars")]
    pub description_chars: usize,

    /// Deadline for a single generation call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Region the discovery news summary is localized to.
    #[serde(default = "default_insight_region")]
    pub insight_region: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            catalog_limit: default_catalog_limit(),
            description_chars: default_description_chars(),
            timeout_secs: default_timeout_secs(),
            insight_region: default_insight_region(),
        }
    }
}

fn default_catalog_limit() -> usize {
    20
}

fn default_description_chars() -> usize {
    240
}

fn default_insight_region() -> String {
    "Shanghai".to_string()
}
