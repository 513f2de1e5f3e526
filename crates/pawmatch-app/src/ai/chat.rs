// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Matchmaking chat session.
//!
//! The transcript starts with a fixed greeting. A send appends the user
//! entry at once, builds one prompt from the catalog snapshot, and appends
//! exactly one assistant entry: the generated text or a fallback string.
//! Only one reply can be in flight; sends while composing are ignored.
//! Clearing starts a new transcript epoch, and a reply generated for an
//! earlier epoch is neither shown nor saved.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pawmatch_config::model::AiConfig;
use pawmatch_core::types::{GenerationRequest, Pet, Role};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ai::prompt::{chat_prompt, CatalogLimits, CONNECTION_FAILED, DRIFTED_OFF, GREETING};
use crate::ai::{generate_within, SharedGenerator};
use crate::hooks::MessagesHook;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: Role,
    pub content: String,
}

impl ChatEntry {
    fn greeting() -> Self {
        Self {
            role: Role::Assistant,
            content: GREETING.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatState {
    pub entries: Vec<ChatEntry>,
    /// A reply is being generated.
    pub composing: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            entries: vec![ChatEntry::greeting()],
            composing: false,
        }
    }
}

/// What happened to one [`ChatSession::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or a reply was already being composed.
    Ignored,
    /// Generated text was appended.
    Replied(String),
    /// A fallback string was appended instead of generated text.
    Fallback(String),
    /// The session was closed before the reply arrived; nothing appended.
    Closed,
    /// The transcript was cleared before the reply arrived; nothing appended.
    Discarded,
}

pub struct ChatSession {
    generator: SharedGenerator,
    limits: CatalogLimits,
    deadline: Duration,
    catalog: Mutex<Vec<Pet>>,
    history: Option<Arc<MessagesHook>>,
    state: watch::Sender<ChatState>,
    /// Bumped by [`ChatSession::clear`]. Only changed under the state lock.
    epoch: AtomicU64,
    closed: CancellationToken,
}

impl ChatSession {
    pub fn new(generator: SharedGenerator, config: &AiConfig) -> Self {
        Self {
            generator,
            limits: CatalogLimits::from(config),
            deadline: Duration::from_secs(config.timeout_secs),
            catalog: Mutex::new(Vec::new()),
            history: None,
            state: watch::channel(ChatState::default()).0,
            epoch: AtomicU64::new(0),
            closed: CancellationToken::new(),
        }
    }

    /// Also persist both sides of every exchange through `history`.
    pub fn with_history(mut self, history: Arc<MessagesHook>) -> Self {
        self.history = Some(history);
        self
    }

    /// Overrides the generation deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Replaces the pets offered to the model.
    pub async fn set_catalog(&self, pets: Vec<Pet>) {
        *self.catalog.lock().await = pets;
    }

    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ChatState {
        self.state.borrow().clone()
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }

    /// Sends `text` as typed. Whitespace only matters for the blank check.
    pub async fn send(&self, text: &str) -> SendOutcome {
        if self.closed.is_cancelled() {
            return SendOutcome::Closed;
        }

        let mut epoch = None;
        self.state.send_if_modified(|state| {
            if text.trim().is_empty() || state.composing {
                return false;
            }
            state.entries.push(ChatEntry {
                role: Role::User,
                content: text.to_string(),
            });
            state.composing = true;
            epoch = Some(self.epoch.load(Ordering::SeqCst));
            true
        });
        let Some(epoch) = epoch else {
            debug!("chat send ignored");
            return SendOutcome::Ignored;
        };

        if let Some(history) = &self.history
            && self.is_current(epoch)
        {
            let outcome = history.send_user(text).await;
            if let Some(err) = outcome.error {
                warn!(error = %err, "user message not persisted");
            }
        }

        let prompt = {
            let catalog = self.catalog.lock().await;
            chat_prompt(&catalog, text, self.limits)
        };
        let request = GenerationRequest::text(prompt);

        let result = tokio::select! {
            _ = self.closed.cancelled() => {
                debug!("chat session closed while composing, reply dropped");
                return SendOutcome::Closed;
            }
            result = generate_within(&self.generator, request, self.deadline) => result,
        };

        let outcome = match result {
            Ok(generation) => match generation.non_blank_text() {
                Some(reply) => SendOutcome::Replied(reply.to_string()),
                None => {
                    info!("generator returned blank text");
                    SendOutcome::Fallback(DRIFTED_OFF.to_string())
                }
            },
            Err(err) => {
                warn!(error = %err, "chat generation failed");
                SendOutcome::Fallback(CONNECTION_FAILED.to_string())
            }
        };
        let reply = match &outcome {
            SendOutcome::Replied(text) | SendOutcome::Fallback(text) => text.clone(),
            _ => return outcome,
        };

        if self.closed.is_cancelled() {
            return SendOutcome::Closed;
        }
        let appended = self.state.send_if_modified(|state| {
            if !self.is_current(epoch) {
                return false;
            }
            state.entries.push(ChatEntry {
                role: Role::Assistant,
                content: reply.clone(),
            });
            state.composing = false;
            true
        });
        if !appended {
            debug!("transcript cleared while composing, reply dropped");
            return SendOutcome::Discarded;
        }

        if let Some(history) = &self.history
            && self.is_current(epoch)
        {
            let saved = history.send_assistant(&reply).await;
            if let Some(err) = saved.error {
                warn!(error = %err, "assistant reply not persisted");
            }
        }
        outcome
    }

    /// Resets the transcript to the greeting and clears persisted history.
    ///
    /// A reply still being generated is dropped when it arrives.
    pub async fn clear(&self) {
        self.state.send_modify(|state| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *state = ChatState::default();
        });
        if let Some(history) = &self.history {
            let outcome = history.clear().await;
            if let Some(err) = outcome.error {
                warn!(error = %err, "chat history not cleared");
            }
        }
    }

    /// Ends the session. A reply still being generated is discarded.
    pub fn close(&self) {
        self.closed.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawmatch_core::GenerationAdapter;
    use pawmatch_test_utils::MockGenerator;

    fn session(generator: MockGenerator) -> ChatSession {
        let generator: Arc<dyn GenerationAdapter> = Arc::new(generator);
        ChatSession::new(Some(generator), &AiConfig::default())
    }

    #[tokio::test]
    async fn reply_clears_composing() {
        let chat = session(MockGenerator::with_responses(vec!["Meet Luna!"]));
        let mut rx = chat.subscribe();
        assert_eq!(chat.send("hello").await, SendOutcome::Replied("Meet Luna!".into()));
        let state = rx.borrow_and_update().clone();
        assert!(!state.composing);
        assert_eq!(state.entries.last().map(|e| e.content.as_str()), Some("Meet Luna!"));
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn generation_failure_is_logged() {
        let generator = MockGenerator::new();
        generator.add_failure("quota exceeded").await;
        let chat = session(generator);
        chat.send("hello").await;
        assert!(logs_contain("chat generation failed"));
        assert!(logs_contain("quota exceeded"));
    }
}
