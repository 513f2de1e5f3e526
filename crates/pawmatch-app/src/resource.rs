// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observable `{data, loading, error}` state shared by every hook.
//!
//! A [`ResourceCell`] publishes [`Resource`] snapshots through a
//! `tokio::sync::watch` channel. Each fetch takes a monotonically
//! increasing generation token; a completion is applied only if its token
//! is still the latest and the cell has not been unmounted.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use pawmatch_core::{ApiError, ApiResult};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Snapshot of a hook's state.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    pub data: T,
    /// True while a fetch is in flight.
    pub loading: bool,
    /// Error from the most recent fetch, cleared when the next one starts.
    pub error: Option<ApiError>,
}

/// Result of a hook mutator. Never an `Err`; failures are reported here.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> MutationOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl MutationOutcome<()> {
    pub fn done() -> Self {
        Self::ok(())
    }
}

impl<T> From<ApiResult<T>> for MutationOutcome<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failed(err),
        }
    }
}

/// Token identifying one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

pub struct ResourceCell<T> {
    name: &'static str,
    tx: watch::Sender<Resource<T>>,
    generation: AtomicU64,
    unmounted: CancellationToken,
}

impl<T: Clone + Send + Sync + 'static> ResourceCell<T> {
    pub fn new(name: &'static str, initial: T) -> Self {
        let (tx, _) = watch::channel(Resource {
            data: initial,
            loading: false,
            error: None,
        });
        Self {
            name,
            tx,
            generation: AtomicU64::new(0),
            unmounted: CancellationToken::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<T>> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Resource<T> {
        self.tx.borrow().clone()
    }

    pub fn is_mounted(&self) -> bool {
        !self.unmounted.is_cancelled()
    }

    /// Starts a fetch: sets `loading`, clears `error`, returns the new token.
    ///
    /// Returns `None` once the cell is unmounted.
    pub fn begin(&self) -> Option<FetchToken> {
        if !self.is_mounted() {
            return None;
        }
        let token = FetchToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        self.tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        Some(token)
    }

    /// Applies a fetch result if `token` is still current.
    ///
    /// On failure the previous data is kept and `error` is set. Returns
    /// whether the result was applied.
    pub fn finish(&self, token: FetchToken, result: ApiResult<T>) -> bool {
        if !self.is_mounted() {
            debug!(hook = self.name, "fetch completed after unmount, dropped");
            return false;
        }
        if self.generation.load(Ordering::SeqCst) != token.0 {
            debug!(hook = self.name, token = token.0, "stale fetch dropped");
            return false;
        }
        self.tx.send_modify(|state| {
            state.loading = false;
            match result {
                Ok(data) => state.data = data,
                Err(err) => state.error = Some(err),
            }
        });
        true
    }

    /// Runs one fetch through [`ResourceCell::begin`] and [`ResourceCell::finish`].
    pub async fn load(&self, fetch: impl Future<Output = ApiResult<T>>) -> bool {
        let Some(token) = self.begin() else {
            return false;
        };
        let result = fetch.await;
        self.finish(token, result)
    }

    /// Replaces the data with `initial` and invalidates every issued token.
    ///
    /// Used when the identity being fetched changes, so neither the old
    /// entity nor a late completion for it can show through.
    pub fn reset(&self, initial: T) {
        if !self.is_mounted() {
            return;
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.tx.send_modify(|state| {
            state.data = initial;
            state.loading = false;
            state.error = None;
        });
    }

    /// Splices local data after a successful mutation.
    pub fn update(&self, splice: impl FnOnce(&mut T)) {
        if self.is_mounted() {
            self.tx.send_modify(|state| splice(&mut state.data));
        }
    }

    /// Stops all future updates. In-flight fetches are discarded on arrival.
    pub fn unmount(&self) {
        self.unmounted.cancel();
    }

    /// Resolves when [`ResourceCell::unmount`] is called.
    pub fn unmounted(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.unmounted.cancelled()
    }
}
