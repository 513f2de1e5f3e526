// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store-neutral request model.
//!
//! A [`StoreRequest`] names a table, an [`Operation`], and a [`Query`]
//! (filters, ordering, limit, single-row flag). Store adapters translate it
//! into their own wire format.

use serde_json::Value;
use strum::{Display, EnumString};

/// Tables known to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Table {
    Pets,
    Applications,
    Favorites,
    Messages,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Pets,
        Table::Applications,
        Table::Favorites,
        Table::Messages,
    ];
}

/// A single row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Column equals value.
    Eq { column: String, value: Value },
    /// Case-insensitive match where `%` matches any run of characters and
    /// `_` one character. A backslash makes the next character literal.
    ILike { column: String, pattern: String },
    /// Column is greater than or equal to value.
    Gte { column: String, value: Value },
    /// Column is less than or equal to value.
    Lte { column: String, value: Value },
    /// Array column contains every listed value.
    Contains { column: String, values: Vec<Value> },
    /// Column equals one of the listed values.
    In { column: String, values: Vec<Value> },
    /// At least one of the nested predicates holds.
    Any(Vec<Filter>),
}

impl Filter {
    /// Case-insensitive substring predicate. `needle` is matched literally.
    pub fn substring(column: &str, needle: &str) -> Self {
        Filter::ILike {
            column: column.to_string(),
            pattern: format!("%{}%", escape_like(needle)),
        }
    }
}

/// Escapes the `LIKE` metacharacters `%`, `_` and `\` in `text`.
pub fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// Filter, sort and shape of a request. Filters combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
    /// Expect exactly one row back.
    pub single: bool,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::Eq {
            column: column.to_string(),
            value: value.into(),
        })
    }

    pub fn ilike(self, column: &str, pattern: impl Into<String>) -> Self {
        self.filter(Filter::ILike {
            column: column.to_string(),
            pattern: pattern.into(),
        })
    }

    pub fn gte(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::Gte {
            column: column.to_string(),
            value: value.into(),
        })
    }

    pub fn lte(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::Lte {
            column: column.to_string(),
            value: value.into(),
        })
    }

    pub fn contains<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.filter(Filter::Contains {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn in_list<V: Into<Value>>(self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.filter(Filter::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn any(self, filters: Vec<Filter>) -> Self {
        self.filter(Filter::Any(filters))
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }
}

/// What to do with the rows a [`Query`] selects.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Select,
    /// Insert one row and return it.
    Insert(Value),
    /// Patch every matching row and return the updated rows.
    Update(Value),
    Delete,
    /// Exact number of matching rows.
    Count,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreRequest {
    pub table: Table,
    pub operation: Operation,
    pub query: Query,
}

impl StoreRequest {
    pub fn new(table: Table, operation: Operation, query: Query) -> Self {
        Self {
            table,
            operation,
            query,
        }
    }
}

/// Raw result from a store adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOutput {
    Rows(Vec<Value>),
    Count(u64),
    Empty,
}
