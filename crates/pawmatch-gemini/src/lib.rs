// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini generation adapter for PawMatch.
//!
//! Implements [`GenerationAdapter`] over the Gemini `generateContent` API,
//! with optional web-search grounding.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use pawmatch_config::PawmatchConfig;
use pawmatch_core::types::{Generation, GenerationRequest, GroundingLink};
use pawmatch_core::{AdapterType, GenerationAdapter, HealthStatus, PawError, PluginAdapter};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::GenerateContentRequest;

/// Gemini generator implementing [`GenerationAdapter`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` env var -> disabled.
pub struct GeminiGenerator {
    client: GeminiClient,
}

impl GeminiGenerator {
    /// Builds a generator from configuration.
    ///
    /// Returns `Ok(None)` when no API key is available; AI features are then
    /// disabled rather than failing startup.
    pub fn from_config(config: &PawmatchConfig) -> Result<Option<Self>, PawError> {
        let Some(api_key) = resolve_api_key(&config.gemini.api_key) else {
            info!("no Gemini API key configured, AI features disabled");
            return Ok(None);
        };

        let client = GeminiClient::new(
            &api_key,
            &config.gemini.base_url,
            &config.gemini.model,
            Duration::from_secs(config.ai.timeout_secs),
        )?;
        info!(model = %config.gemini.model, "Gemini generator initialized");
        Ok(Some(Self { client }))
    }

    /// Creates a generator with an existing client (for testing).
    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

/// Resolves the API key from config, then the `GEMINI_API_KEY` env var.
fn resolve_api_key(config_key: &Option<String>) -> Option<String> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Some(key.clone());
    }
    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
}

#[async_trait]
impl PluginAdapter for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generator
    }

    async fn health_check(&self) -> Result<HealthStatus, PawError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl GenerationAdapter for GeminiGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, PawError> {
        let body = GenerateContentRequest::prompt(&request.prompt, request.grounded);
        let response = self.client.generate_content(&body).await?;

        let links: Vec<GroundingLink> = response
            .web_sources()
            .into_iter()
            .map(|(title, uri)| GroundingLink { title, uri })
            .collect();
        let text = response.text();
        debug!(
            model = self.client.model(),
            chars = text.len(),
            links = links.len(),
            grounded = request.grounded,
            "generation complete"
        );
        Ok(Generation { text, links })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn config_key_wins() {
        assert_eq!(
            resolve_api_key(&Some("from-config".into())).as_deref(),
            Some("from-config")
        );
    }

    #[test]
    #[serial]
    fn missing_key_disables_generator() {
        // SAFETY: serialized with every other env-mutating test.
        unsafe { std::env::remove_var("GEMINI_API_KEY") };
        let config = PawmatchConfig::default();
        assert!(GeminiGenerator::from_config(&config).unwrap().is_none());
    }

    #[test]
    #[serial]
    fn env_key_is_used_when_config_blank() {
        // SAFETY: serialized with every other env-mutating test.
        unsafe { std::env::set_var("GEMINI_API_KEY", "from-env") };
        let key = resolve_api_key(&Some("  ".into()));
        unsafe { std::env::remove_var("GEMINI_API_KEY") };
        assert_eq!(key.as_deref(), Some("from-env"));
    }

    #[tokio::test]
    async fn generate_returns_text_and_links() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-test:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Adoption fairs are up."}]},
                    "groundingMetadata": {"groundingChunks": [
                        {"web": {"title": "Pet News", "uri": "https://news.example/1"}}
                    ]}
                }]
            })))
            .mount(&server)
            .await;

        let client =
            GeminiClient::new("k", &server.uri(), "gemini-test", Duration::from_secs(5)).unwrap();
        let generator = GeminiGenerator::with_client(client);
        let generation = generator
            .generate(GenerationRequest::grounded("news"))
            .await
            .unwrap();
        assert_eq!(generation.text, "Adoption fairs are up.");
        assert_eq!(
            generation.links,
            vec![GroundingLink {
                title: "Pet News".into(),
                uri: "https://news.example/1".into()
            }]
        );
    }
}
