// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Localized adoption news shown on the discovery page.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Utc};
use pawmatch_core::types::{GenerationRequest, GroundingLink};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::ai::prompt::insight_prompt;
use crate::ai::{generate_within, SharedGenerator};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InsightState {
    #[default]
    Idle,
    Loading,
    Ready {
        text: String,
        links: Vec<GroundingLink>,
    },
    /// Generation failed or returned nothing; not retried.
    Unavailable,
}

pub struct DiscoveryInsight {
    generator: SharedGenerator,
    region: String,
    deadline: Duration,
    state: watch::Sender<InsightState>,
}

impl DiscoveryInsight {
    pub fn new(generator: SharedGenerator, region: impl Into<String>, deadline: Duration) -> Self {
        Self {
            generator,
            region: region.into(),
            deadline,
            state: watch::channel(InsightState::Idle).0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<InsightState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> InsightState {
        self.state.borrow().clone()
    }

    /// Issues the grounded request once. Later calls return without doing anything.
    pub async fn load(&self) {
        let started = self.state.send_if_modified(|state| {
            if *state != InsightState::Idle {
                return false;
            }
            *state = InsightState::Loading;
            true
        });
        if !started {
            debug!("insight already requested");
            return;
        }

        let year = Utc::now().year();
        let request = GenerationRequest::grounded(insight_prompt(&self.region, year));
        let next = match generate_within(&self.generator, request, self.deadline).await {
            Ok(generation) => match generation.non_blank_text() {
                Some(text) => {
                    info!(region = %self.region, links = generation.links.len(), "insight ready");
                    InsightState::Ready {
                        text: text.to_string(),
                        links: generation.links.clone(),
                    }
                }
                None => InsightState::Unavailable,
            },
            Err(err) => {
                warn!(region = %self.region, error = %err, "insight generation failed");
                InsightState::Unavailable
            }
        };
        self.state.send_replace(next);
    }

    /// Runs [`load`](Self::load) in the background.
    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<()> {
        let insight = Arc::clone(self);
        tokio::spawn(async move { insight.load().await })
    }
}
