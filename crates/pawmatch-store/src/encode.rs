// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation of [`Query`] into PostgREST query-string parameters.

use pawmatch_core::query::{Filter, Query};
use serde_json::Value;

/// Encode filters, ordering and limit as `(key, value)` pairs.
///
/// Values are left unescaped; `reqwest` percent-encodes the query string.
pub fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = query
        .filters
        .iter()
        .map(|filter| match filter {
            Filter::Any(nested) => ("or".to_string(), format!("({})", or_group(nested))),
            other => {
                let (column, expr) = column_expr(other);
                (column, expr)
            }
        })
        .collect();

    if let Some(order) = &query.order {
        params.push(("order".into(), format!("{}.{}", order.column, order.direction)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".into(), limit.to_string()));
    }
    params
}

/// `column` and `op.value` for a non-`Any` filter.
fn column_expr(filter: &Filter) -> (String, String) {
    match filter {
        Filter::Eq { column, value } => (column.clone(), format!("eq.{}", scalar(value))),
        Filter::ILike { column, pattern } => {
            (column.clone(), format!("ilike.{}", star_wildcards(pattern)))
        }
        Filter::Gte { column, value } => (column.clone(), format!("gte.{}", scalar(value))),
        Filter::Lte { column, value } => (column.clone(), format!("lte.{}", scalar(value))),
        Filter::Contains { column, values } => (
            column.clone(),
            format!(
                "cs.{{{}}}",
                values.iter().map(|v| quoted(&scalar(v))).collect::<Vec<_>>().join(",")
            ),
        ),
        Filter::In { column, values } => (
            column.clone(),
            format!(
                "in.({})",
                values.iter().map(|v| quoted(&scalar(v))).collect::<Vec<_>>().join(",")
            ),
        ),
        Filter::Any(nested) => ("or".into(), format!("({})", or_group(nested))),
    }
}

/// Body of an `or=(...)` group: `col.op.value` terms separated by commas.
fn or_group(filters: &[Filter]) -> String {
    filters
        .iter()
        .map(|filter| match filter {
            Filter::Any(nested) => format!("or({})", or_group(nested)),
            Filter::Eq { .. } | Filter::ILike { .. } | Filter::Gte { .. } | Filter::Lte { .. } => {
                let (column, expr) = column_expr(filter);
                let (op, value) = expr.split_once('.').unwrap_or((expr.as_str(), ""));
                format!("{column}.{op}.{}", reserved_quoted(value))
            }
            other => {
                let (column, expr) = column_expr(other);
                format!("{column}.{expr}")
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".into(),
        other => other.to_string(),
    }
}

/// Double-quote a list element, escaping quotes and backslashes.
fn quoted(raw: &str) -> String {
    format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
}

/// PostgREST spells the `%` wildcard as `*`. Escaped `\%` stays literal.
fn star_wildcards(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                out.extend(chars.next());
            }
            '%' => out.push('*'),
            _ => out.push(c),
        }
    }
    out
}

/// Quote a value inside a logic group only when it holds reserved characters.
fn reserved_quoted(raw: &str) -> String {
    if raw
        .chars()
        .any(|c| matches!(c, ',' | '.' | ':' | '(' | ')' | '"' | ' ' | '\\'))
    {
        quoted(raw)
    } else {
        raw.to_string()
    }
}
