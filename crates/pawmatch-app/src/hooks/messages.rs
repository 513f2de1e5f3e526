// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use pawmatch_core::types::ChatMessage;
use pawmatch_services::{MessageService, DEFAULT_MESSAGE_LIMIT};
use tokio::sync::{watch, Mutex};

use crate::resource::{MutationOutcome, Resource, ResourceCell};

/// A user's persisted chat history, oldest first.
pub struct MessagesHook {
    service: MessageService,
    user_id: Mutex<String>,
    cell: ResourceCell<Vec<ChatMessage>>,
}

impl MessagesHook {
    pub fn new(service: MessageService, user_id: impl Into<String>) -> Self {
        Self {
            service,
            user_id: Mutex::new(user_id.into()),
            cell: ResourceCell::new("messages", Vec::new()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<Vec<ChatMessage>>> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> Resource<Vec<ChatMessage>> {
        self.cell.snapshot()
    }

    pub async fn mount(&self) {
        self.refetch().await;
    }

    pub async fn refetch(&self) {
        let user_id = self.user_id.lock().await.clone();
        if user_id.is_empty() {
            return;
        }
        self.cell
            .load(self.service.get_user_messages(&user_id, DEFAULT_MESSAGE_LIMIT))
            .await;
    }

    pub async fn set_user(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        {
            let mut current = self.user_id.lock().await;
            if *current == user_id {
                return;
            }
            *current = user_id;
        }
        self.refetch().await;
    }

    pub async fn send_user(&self, content: &str) -> MutationOutcome<ChatMessage> {
        let user_id = self.user_id.lock().await.clone();
        let result = self.service.send_user_message(&user_id, content).await;
        self.append(result)
    }

    pub async fn send_assistant(&self, content: &str) -> MutationOutcome<ChatMessage> {
        let user_id = self.user_id.lock().await.clone();
        let result = self.service.send_assistant_message(&user_id, content).await;
        self.append(result)
    }

    fn append(&self, result: pawmatch_core::ApiResult<ChatMessage>) -> MutationOutcome<ChatMessage> {
        if let Ok(message) = &result {
            let message = message.clone();
            self.cell.update(|list| list.push(message));
        }
        result.into()
    }

    /// Deletes the whole history; the local list is emptied on success.
    pub async fn clear(&self) -> MutationOutcome<()> {
        let user_id = self.user_id.lock().await.clone();
        match self.service.clear_user_messages(&user_id).await {
            Ok(()) => {
                self.cell.update(Vec::clear);
                MutationOutcome::done()
            }
            Err(err) => MutationOutcome::failed(err),
        }
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }
}
