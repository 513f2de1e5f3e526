// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed request wrapper over a [`RecordStore`].
//!
//! Every call returns `ApiResult<T>`; adapter failures and decode failures
//! are both normalized into [`ApiError`] here, so nothing else crosses the
//! boundary. The gateway never retries.

use std::sync::Arc;

use pawmatch_core::query::{Operation, Query, StoreOutput, StoreRequest, Table};
use pawmatch_core::{ApiError, ApiResult, PawError, RecordStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Code attached when a row cannot be decoded into the requested type.
pub const DECODE_CODE: &str = "decode";

/// Shared handle to the record store.
#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn RecordStore>,
}

impl Gateway {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// The underlying adapter, for health checks.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    async fn run(&self, table: Table, operation: Operation, query: Query) -> ApiResult<StoreOutput> {
        let kind = operation_name(&operation);
        let request = StoreRequest::new(table, operation, query);
        match self.store.execute(request).await {
            Ok(output) => {
                debug!(%table, operation = kind, "store call succeeded");
                Ok(output)
            }
            Err(err) => {
                if err.is_no_rows() {
                    debug!(%table, operation = kind, "store call matched no rows");
                } else {
                    warn!(%table, operation = kind, error = %err, "store call failed");
                }
                Err(ApiError::from_error(store_message(&err), &err))
            }
        }
    }

    /// Every row matching `query`.
    pub async fn select<T: DeserializeOwned>(&self, table: Table, query: Query) -> ApiResult<Vec<T>> {
        let rows = rows(self.run(table, Operation::Select, query).await?)?;
        rows.into_iter().map(decode).collect()
    }

    /// Exactly one row; zero matches yields the no-rows code.
    pub async fn select_single<T: DeserializeOwned>(&self, table: Table, query: Query) -> ApiResult<T> {
        let output = self.run(table, Operation::Select, query.single()).await?;
        first(output)
    }

    /// Inserts `body` and returns the stored row.
    pub async fn insert<T, B>(&self, table: Table, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let value = encode(body)?;
        let output = self
            .run(table, Operation::Insert(value), Query::new().single())
            .await?;
        first(output)
    }

    /// Patches the single row matching `query` and returns it.
    pub async fn update<T, B>(&self, table: Table, query: Query, patch: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let value = encode(patch)?;
        let output = self
            .run(table, Operation::Update(value), query.single())
            .await?;
        first(output)
    }

    /// Deletes every row matching `query`.
    pub async fn delete(&self, table: Table, query: Query) -> ApiResult<()> {
        self.run(table, Operation::Delete, query).await.map(|_| ())
    }

    /// Exact number of rows matching `query`.
    pub async fn count(&self, table: Table, query: Query) -> ApiResult<u64> {
        match self.run(table, Operation::Count, query).await? {
            StoreOutput::Count(n) => Ok(n),
            other => Err(unexpected(&other)),
        }
    }
}

fn operation_name(operation: &Operation) -> &'static str {
    match operation {
        Operation::Select => "select",
        Operation::Insert(_) => "insert",
        Operation::Update(_) => "update",
        Operation::Delete => "delete",
        Operation::Count => "count",
    }
}

fn store_message(err: &PawError) -> String {
    match err {
        PawError::Store { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

fn rows(output: StoreOutput) -> ApiResult<Vec<Value>> {
    match output {
        StoreOutput::Rows(rows) => Ok(rows),
        StoreOutput::Empty => Ok(Vec::new()),
        other => Err(unexpected(&other)),
    }
}

fn first<T: DeserializeOwned>(output: StoreOutput) -> ApiResult<T> {
    let row = rows(output)?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::from_error("no rows returned", &PawError::no_rows()))?;
    decode(row)
}

fn decode<T: DeserializeOwned>(row: Value) -> ApiResult<T> {
    serde_json::from_value(row).map_err(|e| ApiError {
        message: "failed to decode store row".into(),
        code: Some(DECODE_CODE.into()),
        details: Some(e.to_string()),
    })
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| ApiError {
        message: "failed to encode request body".into(),
        code: Some(DECODE_CODE.into()),
        details: Some(e.to_string()),
    })
}

fn unexpected(output: &StoreOutput) -> ApiError {
    ApiError {
        message: "unexpected store output".into(),
        code: None,
        details: Some(format!("{output:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawmatch_core::types::Pet;
    use pawmatch_test_utils::{pet_row, MemoryStore, OpKind};
    use serde_json::json;

    fn gateway_with(store: MemoryStore) -> (Gateway, Arc<MemoryStore>) {
        let store = Arc::new(store);
        (Gateway::new(store.clone()), store)
    }

    #[tokio::test]
    async fn select_decodes_rows() {
        let (gateway, _) = gateway_with(MemoryStore::new().with_rows(
            Table::Pets,
            vec![pet_row("p1", "Luna", "Ragdoll"), pet_row("p2", "Max", "Beagle")],
        ));
        let pets: Vec<Pet> = gateway.select(Table::Pets, Query::new()).await.unwrap();
        assert_eq!(pets.len(), 2);
        assert_eq!(pets[0].name, "Luna");
    }

    #[tokio::test]
    async fn select_single_missing_is_no_rows() {
        let (gateway, _) = gateway_with(MemoryStore::new());
        let err = gateway
            .select_single::<Pet>(Table::Pets, Query::new().eq("id", "nope"))
            .await
            .unwrap_err();
        assert!(err.is_no_rows());
    }

    #[tokio::test]
    async fn store_failure_becomes_api_error() {
        let (gateway, store) = gateway_with(MemoryStore::new());
        store.fail_next(Table::Pets, Some(OpKind::Select), "connection reset").await;
        let err = gateway
            .select::<Pet>(Table::Pets, Query::new())
            .await
            .unwrap_err();
        assert_eq!(err.message, "connection reset");
        assert_eq!(err.code.as_deref(), Some("injected"));
    }

    #[tokio::test]
    async fn bad_row_is_decode_error() {
        let (gateway, _) = gateway_with(
            MemoryStore::new().with_rows(Table::Pets, vec![json!({"id": "p1", "name": 7})]),
        );
        let err = gateway
            .select::<Pet>(Table::Pets, Query::new())
            .await
            .unwrap_err();
        assert_eq!(err.code.as_deref(), Some(DECODE_CODE));
    }

    #[tokio::test]
    async fn delete_and_count() {
        let (gateway, _) = gateway_with(MemoryStore::new().with_rows(
            Table::Favorites,
            vec![
                json!({"user_id": "u", "pet_id": "p1"}),
                json!({"user_id": "u", "pet_id": "p2"}),
            ],
        ));
        gateway
            .delete(Table::Favorites, Query::new().eq("pet_id", "p1"))
            .await
            .unwrap();
        let n = gateway.count(Table::Favorites, Query::new()).await.unwrap();
        assert_eq!(n, 1);
    }

    #[tokio::test]
    async fn gateway_issues_exactly_one_call_on_failure() {
        let (gateway, store) = gateway_with(MemoryStore::new());
        store.fail_next(Table::Messages, None, "boom").await;
        let _ = gateway.count(Table::Messages, Query::new()).await;
        assert_eq!(store.call_count(Table::Messages).await, 1);
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn failures_are_logged() {
        let (gateway, store) = gateway_with(MemoryStore::new());
        store.fail_next(Table::Pets, None, "boom").await;
        let _ = gateway.count(Table::Pets, Query::new()).await;
        assert!(logs_contain("store call failed"));
    }
}
