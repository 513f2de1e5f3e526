// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading.
//!
//! Compiled defaults, then each file from [`config_paths`] in order, then
//! `PAWMATCH_<SECTION>_<KEY>` environment variables. Later layers win.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PawmatchConfig;

/// Top-level config sections, used to split env var names.
const SECTIONS: [&str; 4] = ["app", "store", "gemini", "ai"];

/// Config files in merge order, lowest priority first.
///
/// The last entry is relative and resolved against the working directory.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/pawmatch/pawmatch.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("pawmatch").join("pawmatch.toml"));
    }
    paths.push(PathBuf::from("pawmatch.toml"));
    paths
}

fn defaults() -> Figment {
    Figment::from(Serialized::defaults(PawmatchConfig::default()))
}

/// Load configuration from every layer.
pub fn load_config() -> Result<PawmatchConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PawmatchConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

/// Load configuration from one file plus env overrides.
pub fn load_config_from_path(path: &Path) -> Result<PawmatchConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full layered figment, before extraction.
pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(defaults(), |figment, path| figment.merge(Toml::file(path)))
        .merge(env_provider())
}

/// Maps `PAWMATCH_STORE_API_KEY` to `store.api_key`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that contain underscores survive.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("PAWMATCH_").map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        SECTIONS
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|field| format!("{section}.{field}"))
            })
            .unwrap_or(key)
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_file_has_highest_priority() {
        let paths = config_paths();
        assert_eq!(paths.first(), Some(&PathBuf::from("/etc/pawmatch/pawmatch.toml")));
        assert_eq!(paths.last(), Some(&PathBuf::from("pawmatch.toml")));
    }

    #[test]
    fn inline_toml_overrides_defaults() {
        let config = load_config_from_str("[ai]\ninsight_region = \"Hangzhou\"\n").unwrap();
        assert_eq!(config.ai.insight_region, "Hangzhou");
        assert_eq!(config.ai.catalog_limit, 20);
    }
}
