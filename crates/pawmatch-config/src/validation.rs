// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Missing store secrets are the only fatal startup condition; a missing
//! Gemini key only disables AI features and is not reported here.

use crate::diagnostic::ConfigError;
use crate::model::PawmatchConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &PawmatchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    match config.store.url.as_deref().map(str::trim) {
        None | Some("") => errors.push(ConfigError::Validation {
            message: "store.url is required (set [store] url or PAWMATCH_STORE_URL)".to_string(),
        }),
        Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
            errors.push(ConfigError::Validation {
                message: format!("store.url `{url}` must start with http:// or https://"),
            });
        }
        Some(_) => {}
    }

    if config
        .store
        .api_key
        .as_deref()
        .is_none_or(|k| k.trim().is_empty())
    {
        errors.push(ConfigError::Validation {
            message: "store.api_key is required (set [store] api_key or PAWMATCH_STORE_API_KEY)"
                .to_string(),
        });
    }

    if config.store.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "store.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.ai.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "ai.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.ai.catalog_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "ai.catalog_limit must be at least 1".to_string(),
        });
    }

    if config.app.user_id.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "app.user_id must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
