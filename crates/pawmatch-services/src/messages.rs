// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted chat history.

use pawmatch_core::query::{Direction, Query, Table};
use pawmatch_core::types::{ChatMessage, NewChatMessage, Role};
use pawmatch_core::ApiResult;
use pawmatch_store::Gateway;
use tracing::debug;

/// Default number of messages loaded for a user.
pub const DEFAULT_MESSAGE_LIMIT: usize = 50;

/// Reads and writes the `messages` table.
#[derive(Clone)]
pub struct MessageService {
    gateway: Gateway,
}

impl MessageService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Oldest-first history, at most `limit` messages.
    pub async fn get_user_messages(&self, user_id: &str, limit: usize) -> ApiResult<Vec<ChatMessage>> {
        self.gateway
            .select(
                Table::Messages,
                Query::new()
                    .eq("user_id", user_id)
                    .order_by("created_at", Direction::Asc)
                    .limit(limit),
            )
            .await
            .map_err(|e| e.relabel("failed to fetch messages"))
    }

    pub async fn send_user_message(&self, user_id: &str, content: &str) -> ApiResult<ChatMessage> {
        self.send(user_id, content, Role::User)
            .await
            .map_err(|e| e.relabel("failed to send message"))
    }

    pub async fn send_assistant_message(
        &self,
        user_id: &str,
        content: &str,
    ) -> ApiResult<ChatMessage> {
        self.send(user_id, content, Role::Assistant)
            .await
            .map_err(|e| e.relabel("failed to save assistant reply"))
    }

    async fn send(&self, user_id: &str, content: &str, role: Role) -> ApiResult<ChatMessage> {
        let body = NewChatMessage {
            user_id: user_id.to_string(),
            content: content.to_string(),
            role,
        };
        let message: ChatMessage = self.gateway.insert(Table::Messages, &body).await?;
        debug!(message_id = %message.id, %role, "message stored");
        Ok(message)
    }

    pub async fn delete_message(&self, id: &str) -> ApiResult<()> {
        self.gateway
            .delete(Table::Messages, Query::new().eq("id", id))
            .await
            .map_err(|e| e.relabel("failed to delete message"))
    }

    /// Deletes the user's entire history.
    pub async fn clear_user_messages(&self, user_id: &str) -> ApiResult<()> {
        self.gateway
            .delete(Table::Messages, Query::new().eq("user_id", user_id))
            .await
            .map_err(|e| e.relabel("failed to clear messages"))
    }
}
