// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory record store for deterministic testing.
//!
//! `MemoryStore` implements `RecordStore` by evaluating the same
//! [`Query`] model the HTTP adapter encodes, over JSON rows held in memory.
//! It can inject failures, enforce unique constraints, hold requests
//! until released, and records every request it receives.

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use tokio::sync::{oneshot, Mutex};

use pawmatch_core::error::{NO_ROWS_CODE, UNIQUE_VIOLATION_CODE};
use pawmatch_core::query::{Direction, Filter, Operation, Query, StoreOutput, StoreRequest, Table};
use pawmatch_core::{AdapterType, HealthStatus, PawError, PluginAdapter, RecordStore};

/// Operation kinds, for targeting injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Select,
    Insert,
    Update,
    Delete,
    Count,
}

impl OpKind {
    pub fn of(operation: &Operation) -> Self {
        match operation {
            Operation::Select => OpKind::Select,
            Operation::Insert(_) => OpKind::Insert,
            Operation::Update(_) => OpKind::Update,
            Operation::Delete => OpKind::Delete,
            Operation::Count => OpKind::Count,
        }
    }
}

struct InjectedFailure {
    table: Table,
    op: Option<OpKind>,
    message: String,
}

struct Gate {
    table: Table,
    release: oneshot::Receiver<()>,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<Table, Vec<Value>>,
    unique: HashMap<Table, Vec<&'static str>>,
    failures: Vec<InjectedFailure>,
    gates: VecDeque<Gate>,
    calls: Vec<StoreRequest>,
    seq: i64,
}

impl Inner {
    /// Monotonic creation timestamp so ordering by `created_at` is stable.
    fn next_timestamp(&mut self) -> String {
        self.seq += 1;
        let base = DateTime::<Utc>::from_timestamp(1_767_225_600, 0).unwrap_or_default();
        (base + Duration::seconds(self.seq))
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }

    fn stamp(&mut self, row: &mut Map<String, Value>) {
        if !row.contains_key("id") {
            row.insert("id".into(), Value::String(uuid::Uuid::new_v4().to_string()));
        }
        if !row.contains_key("created_at") {
            let ts = self.next_timestamp();
            row.insert("created_at".into(), Value::String(ts));
        }
    }

    fn take_failure(&mut self, table: Table, op: OpKind) -> Option<String> {
        let idx = self
            .failures
            .iter()
            .position(|f| f.table == table && f.op.is_none_or(|o| o == op))?;
        Some(self.failures.remove(idx).message)
    }
}

/// An in-memory `RecordStore`.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table. Rows without `id`/`created_at` get generated ones.
    pub fn with_rows(self, table: Table, rows: Vec<Value>) -> Self {
        let mut inner = self.inner.into_inner();
        for row in rows {
            if let Value::Object(mut map) = row {
                inner.stamp(&mut map);
                inner.tables.entry(table).or_default().push(Value::Object(map));
            }
        }
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Reject inserts that would duplicate the given column combination.
    pub fn with_unique(self, table: Table, columns: &[&'static str]) -> Self {
        let mut inner = self.inner.into_inner();
        inner.unique.insert(table, columns.to_vec());
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Make the next matching request fail with a store error.
    ///
    /// `op = None` matches any operation on the table.
    pub async fn fail_next(&self, table: Table, op: Option<OpKind>, message: &str) {
        self.inner.lock().await.failures.push(InjectedFailure {
            table,
            op,
            message: message.to_string(),
        });
    }

    /// Hold the next request on `table` until the returned sender fires or drops.
    pub async fn hold_next(&self, table: Table) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner
            .lock()
            .await
            .gates
            .push_back(Gate { table, release: rx });
        tx
    }

    /// Insert a row directly, bypassing failures and constraints.
    pub async fn insert_row(&self, table: Table, row: Value) -> Value {
        let mut inner = self.inner.lock().await;
        let mut map = match row {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        inner.stamp(&mut map);
        let row = Value::Object(map);
        inner.tables.entry(table).or_default().push(row.clone());
        row
    }

    /// Snapshot of a table in insertion order.
    pub async fn rows(&self, table: Table) -> Vec<Value> {
        self.inner
            .lock()
            .await
            .tables
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    /// Looks up one row by `id`.
    pub async fn row(&self, table: Table, id: &str) -> Option<Value> {
        self.rows(table)
            .await
            .into_iter()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(id))
    }

    /// Every request received so far.
    pub async fn calls(&self) -> Vec<StoreRequest> {
        self.inner.lock().await.calls.clone()
    }

    /// Number of requests received for one table.
    pub async fn call_count(&self, table: Table) -> usize {
        self.inner
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| c.table == table)
            .count()
    }

    fn run(inner: &mut Inner, request: StoreRequest) -> Result<StoreOutput, PawError> {
        let StoreRequest {
            table,
            operation,
            query,
        } = request;

        match operation {
            Operation::Select => {
                let rows = inner.tables.get(&table).map(Vec::as_slice).unwrap_or(&[]);
                let mut selected: Vec<Value> = rows
                    .iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .cloned()
                    .collect();
                sort_rows(&mut selected, &query);
                if let Some(limit) = query.limit {
                    selected.truncate(limit);
                }
                single_check(&query, selected)
            }
            Operation::Insert(body) => {
                let Value::Object(mut map) = body else {
                    return Err(PawError::store("insert body must be an object", Some("PGRST102")));
                };
                if let Some(columns) = inner.unique.get(&table) {
                    let existing = inner.tables.get(&table).map(Vec::as_slice).unwrap_or(&[]);
                    let duplicate = existing.iter().any(|row| {
                        columns
                            .iter()
                            .all(|c| row.get(*c).is_some() && row.get(*c) == map.get(*c))
                    });
                    if duplicate {
                        return Err(PawError::store(
                            format!(
                                "duplicate key value violates unique constraint on {table} ({})",
                                columns.join(", ")
                            ),
                            Some(UNIQUE_VIOLATION_CODE),
                        ));
                    }
                }
                inner.stamp(&mut map);
                if !map.contains_key("updated_at")
                    && matches!(table, Table::Pets | Table::Applications)
                {
                    let created = map.get("created_at").cloned().unwrap_or(Value::Null);
                    map.insert("updated_at".into(), created);
                }
                let row = Value::Object(map);
                inner.tables.entry(table).or_default().push(row.clone());
                Ok(StoreOutput::Rows(vec![row]))
            }
            Operation::Update(patch) => {
                let Value::Object(patch) = patch else {
                    return Err(PawError::store("update body must be an object", Some("PGRST102")));
                };
                let ts = inner.next_timestamp();
                let rows = inner.tables.entry(table).or_default();
                let mut updated = Vec::new();
                for row in rows.iter_mut() {
                    if !matches_all(row, &query.filters) {
                        continue;
                    }
                    if let Value::Object(map) = row {
                        for (k, v) in &patch {
                            map.insert(k.clone(), v.clone());
                        }
                        if map.contains_key("updated_at") && !patch.contains_key("updated_at") {
                            map.insert("updated_at".into(), Value::String(ts.clone()));
                        }
                    }
                    updated.push(row.clone());
                }
                single_check(&query, updated)
            }
            Operation::Delete => {
                if let Some(rows) = inner.tables.get_mut(&table) {
                    rows.retain(|row| !matches_all(row, &query.filters));
                }
                Ok(StoreOutput::Empty)
            }
            Operation::Count => {
                let count = inner
                    .tables
                    .get(&table)
                    .map(|rows| rows.iter().filter(|r| matches_all(r, &query.filters)).count())
                    .unwrap_or(0);
                Ok(StoreOutput::Count(count as u64))
            }
        }
    }
}

fn single_check(query: &Query, rows: Vec<Value>) -> Result<StoreOutput, PawError> {
    if query.single && rows.len() != 1 {
        return Err(PawError::Store {
            message: "JSON object requested, multiple (or no) rows returned".into(),
            code: Some(NO_ROWS_CODE.into()),
            details: Some(format!("The result contains {} rows", rows.len())),
        });
    }
    Ok(StoreOutput::Rows(rows))
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, PawError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn execute(&self, request: StoreRequest) -> Result<StoreOutput, PawError> {
        let gate = {
            let mut inner = self.inner.lock().await;
            inner.calls.push(request.clone());
            let idx = inner.gates.iter().position(|g| g.table == request.table);
            idx.and_then(|i| inner.gates.remove(i))
        };
        if let Some(gate) = gate {
            // A dropped sender releases the request as well.
            let _ = gate.release.await;
        }

        let mut inner = self.inner.lock().await;
        if let Some(message) = inner.take_failure(request.table, OpKind::of(&request.operation)) {
            tracing::debug!(table = %request.table, %message, "returning injected failure");
            return Err(PawError::Store {
                message,
                code: Some("injected".into()),
                details: None,
            });
        }
        Self::run(&mut inner, request)
    }
}

fn matches_all(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| matches(row, f))
}

fn matches(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq { column, value } => row.get(column).is_some_and(|v| json_eq(v, value)),
        Filter::ILike { column, pattern } => row
            .get(column)
            .and_then(Value::as_str)
            .is_some_and(|s| like(&s.to_lowercase(), &pattern.to_lowercase())),
        Filter::Gte { column, value } => row
            .get(column)
            .and_then(|v| compare(v, value))
            .is_some_and(|o| o != Ordering::Less),
        Filter::Lte { column, value } => row
            .get(column)
            .and_then(|v| compare(v, value))
            .is_some_and(|o| o != Ordering::Greater),
        Filter::Contains { column, values } => row
            .get(column)
            .and_then(Value::as_array)
            .is_some_and(|arr| values.iter().all(|v| arr.iter().any(|a| json_eq(a, v)))),
        Filter::In { column, values } => row
            .get(column)
            .is_some_and(|v| values.iter().any(|candidate| json_eq(v, candidate))),
        Filter::Any(nested) => nested.iter().any(|f| matches(row, f)),
    }
}

fn json_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// One `LIKE` pattern element.
#[derive(Clone, Copy, PartialEq)]
enum Token {
    Literal(char),
    AnyOne,
    AnyRun,
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            '%' => Token::AnyRun,
            '_' => Token::AnyOne,
            c => Token::Literal(c),
        });
    }
    tokens
}

/// SQL `LIKE` over already-lowercased input; `%` is any run, `_` one char,
/// and `\` escapes the next character.
fn like(text: &str, pattern: &str) -> bool {
    let t: Vec<char> = text.chars().collect();
    let p = tokenize(pattern);
    let (mut ti, mut pi) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while ti < t.len() {
        let step = match p.get(pi) {
            Some(Token::AnyOne) => true,
            Some(Token::Literal(c)) => *c == t[ti],
            _ => false,
        };
        if step {
            ti += 1;
            pi += 1;
        } else if p.get(pi) == Some(&Token::AnyRun) {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((sp, st)) = star {
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|t| *t == Token::AnyRun)
}

fn sort_rows(rows: &mut [Value], query: &Query) {
    let Some(order) = &query.order else {
        return;
    };
    rows.sort_by(|a, b| {
        let ord = match (a.get(&order.column), b.get(&order.column)) {
            (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        };
        match order.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    });
}
