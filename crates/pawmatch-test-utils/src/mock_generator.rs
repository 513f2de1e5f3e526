// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation adapter for deterministic testing.
//!
//! `MockGenerator` implements `GenerationAdapter` with pre-configured
//! responses, so AI orchestration can be tested without network access.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{oneshot, Mutex};

use pawmatch_core::types::{Generation, GenerationRequest, GroundingLink};
use pawmatch_core::{AdapterType, GenerationAdapter, HealthStatus, PawError, PluginAdapter};

enum Scripted {
    Reply(Generation),
    Fail(String),
}

/// A mock generator that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
#[derive(Default)]
pub struct MockGenerator {
    responses: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    gate: Arc<Mutex<Option<oneshot::Receiver<()>>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock generator pre-loaded with text replies.
    pub fn with_responses(responses: Vec<&str>) -> Self {
        let queue = responses
            .into_iter()
            .map(|text| {
                Scripted::Reply(Generation {
                    text: text.to_string(),
                    links: Vec::new(),
                })
            })
            .collect();
        Self {
            responses: Arc::new(Mutex::new(queue)),
            ..Self::default()
        }
    }

    pub async fn add_response(&self, text: &str) {
        self.add_generation(Generation {
            text: text.to_string(),
            links: Vec::new(),
        })
        .await;
    }

    /// Queue a grounded reply with source links.
    pub async fn add_grounded(&self, text: &str, links: &[(&str, &str)]) {
        self.add_generation(Generation {
            text: text.to_string(),
            links: links
                .iter()
                .map(|(title, uri)| GroundingLink {
                    title: title.to_string(),
                    uri: uri.to_string(),
                })
                .collect(),
        })
        .await;
    }

    pub async fn add_generation(&self, generation: Generation) {
        self.responses
            .lock()
            .await
            .push_back(Scripted::Reply(generation));
    }

    /// Queue a provider failure.
    pub async fn add_failure(&self, message: &str) {
        self.responses
            .lock()
            .await
            .push_back(Scripted::Fail(message.to_string()));
    }

    /// Hold the next call until the returned sender fires or drops.
    pub async fn hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().await = Some(rx);
        tx
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    /// Prompt of the most recent request.
    pub async fn last_prompt(&self) -> Option<String> {
        self.requests.lock().await.last().map(|r| r.prompt.clone())
    }
}

#[async_trait]
impl PluginAdapter for MockGenerator {
    fn name(&self) -> &str {
        "mock-generator"
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
impl GenerationAdapter for MockGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, PawError> {
        self.requests.lock().await.push(request);
        let gate = self.gate.lock().await.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match self.responses.lock().await.pop_front() {
            Some(Scripted::Reply(generation)) => Ok(generation),
            Some(Scripted::Fail(message)) => Err(PawError::Provider {
                message,
                source: None,
            }),
            None => Ok(Generation {
                text: "mock response".to_string(),
                links: Vec::new(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_queued_then_default() {
        let generator = MockGenerator::with_responses(vec!["first"]);
        let a = generator.generate(GenerationRequest::text("p1")).await.unwrap();
        let b = generator.generate(GenerationRequest::text("p2")).await.unwrap();
        assert_eq!(a.text, "first");
        assert_eq!(b.text, "mock response");
        assert_eq!(generator.last_prompt().await.as_deref(), Some("p2"));
    }

    #[tokio::test]
    async fn queued_failure_is_provider_error() {
        let generator = MockGenerator::new();
        generator.add_failure("quota exceeded").await;
        let err = generator
            .generate(GenerationRequest::text("p"))
            .await
            .unwrap_err();
        assert!(matches!(err, PawError::Provider { .. }));
    }
}
