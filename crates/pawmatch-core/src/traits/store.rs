// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store adapter trait for the hosted relational data store.

use async_trait::async_trait;

use crate::error::PawError;
use crate::query::{StoreOutput, StoreRequest};
use crate::traits::adapter::PluginAdapter;

/// Adapter for the relational store holding pets, applications,
/// favorites and messages.
///
/// Implementations perform exactly one round trip per call and never retry.
/// A single-row request that matches nothing must fail with
/// [`PawError::no_rows`].
#[async_trait]
pub trait RecordStore: PluginAdapter {
    /// Executes one request against the store.
    async fn execute(&self, request: StoreRequest) -> Result<StoreOutput, PawError>;
}
