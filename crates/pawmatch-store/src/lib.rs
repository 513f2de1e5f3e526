// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data access for PawMatch.
//!
//! [`Gateway`] is the single entry point the domain services use to reach
//! persisted tables. [`PostgrestStore`] implements [`RecordStore`] against a
//! hosted PostgREST/Supabase endpoint.

pub mod client;
pub mod encode;
pub mod gateway;

use std::time::Duration;

use async_trait::async_trait;
use pawmatch_config::model::StoreConfig;
use pawmatch_core::query::{StoreOutput, StoreRequest, Table};
use pawmatch_core::{AdapterType, HealthStatus, PawError, PluginAdapter, RecordStore};
use tracing::info;

pub use crate::client::PostgrestClient;
pub use crate::gateway::Gateway;

/// Hosted relational store reached over PostgREST.
pub struct PostgrestStore {
    client: PostgrestClient,
}

impl PostgrestStore {
    /// Creates the store from validated configuration.
    ///
    /// Missing URL or key is a configuration error; validation normally
    /// catches both before this point.
    pub fn new(config: &StoreConfig) -> Result<Self, PawError> {
        let url = config
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| PawError::Config("store.url is not set".into()))?;
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| PawError::Config("store.api_key is not set".into()))?;

        let client = PostgrestClient::new(url, api_key, Duration::from_secs(config.timeout_secs))?;
        info!(url, "store adapter initialized");
        Ok(Self { client })
    }
}

#[async_trait]
impl PluginAdapter for PostgrestStore {
    fn name(&self) -> &str {
        "postgrest"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, PawError> {
        let status = self.client.ping(Table::Pets).await?;
        Ok(if status.is_success() {
            HealthStatus::Healthy
        } else if status.is_server_error() {
            HealthStatus::Unhealthy(format!("store returned {status}"))
        } else {
            HealthStatus::Degraded(format!("store returned {status}"))
        })
    }
}

#[async_trait]
impl RecordStore for PostgrestStore {
    async fn execute(&self, request: StoreRequest) -> Result<StoreOutput, PawError> {
        self.client.execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_config(url: Option<&str>, key: Option<&str>) -> StoreConfig {
        StoreConfig {
            url: url.map(str::to_string),
            api_key: key.map(str::to_string),
            timeout_secs: 5,
        }
    }

    #[test]
    fn missing_key_is_config_error() {
        let result = PostgrestStore::new(&store_config(Some("https://x.supabase.co"), None));
        assert!(matches!(result, Err(PawError::Config(_))));
    }

    #[tokio::test]
    async fn health_check_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/rest/v1/pets"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let store = PostgrestStore::new(&store_config(Some(&server.uri()), Some("k"))).unwrap();
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn health_check_unauthorized_is_degraded() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = PostgrestStore::new(&store_config(Some(&server.uri()), Some("k"))).unwrap();
        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
    }
}
