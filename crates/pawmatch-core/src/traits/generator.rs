// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation adapter trait for the generative-AI endpoint.

use async_trait::async_trait;

use crate::error::PawError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Generation, GenerationRequest};

/// Adapter for single-shot text generation.
#[async_trait]
pub trait GenerationAdapter: PluginAdapter {
    /// Sends one prompt and returns the full response.
    async fn generate(&self, request: GenerationRequest) -> Result<Generation, PawError>;
}
