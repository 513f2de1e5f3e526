// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pawmatch check` command implementation.
//!
//! Runs diagnostic checks against the hosted store and the AI configuration
//! and prints one line per check.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pawmatch_config::PawmatchConfig;
use pawmatch_core::{HealthStatus, PawError, PluginAdapter, Query, Table};
use pawmatch_gemini::GeminiGenerator;
use pawmatch_store::{Gateway, PostgrestStore};

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: impl Into<String>, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `pawmatch check` command.
pub async fn run_check(config: &PawmatchConfig, plain: bool) -> Result<(), PawError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let store = Arc::new(PostgrestStore::new(&config.store)?);
    let mut results = vec![check_store(store.as_ref()).await];
    let gateway = Gateway::new(store);
    for table in Table::ALL {
        results.push(check_table(&gateway, table).await);
    }
    results.push(check_ai(config));

    println!();
    println!("  pawmatch check");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in &results {
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        println!("{}", render(result, use_color));
    }
    println!();

    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn render(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green().to_string(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow().to_string(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red().to_string(), result.message.red()),
        };
        format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

async fn check_store(store: &dyn PluginAdapter) -> CheckResult {
    let start = Instant::now();
    match store.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new("Store", CheckStatus::Pass, "reachable", start),
        Ok(HealthStatus::Degraded(reason)) => CheckResult::new("Store", CheckStatus::Warn, reason, start),
        Ok(HealthStatus::Unhealthy(reason)) => CheckResult::new("Store", CheckStatus::Fail, reason, start),
        Err(e) => CheckResult::new("Store", CheckStatus::Fail, e.to_string(), start),
    }
}

async fn check_table(gateway: &Gateway, table: Table) -> CheckResult {
    let start = Instant::now();
    let name = format!("Table {table}");
    match gateway.count(table, Query::new()).await {
        Ok(0) if table == Table::Pets => {
            CheckResult::new(name, CheckStatus::Warn, "empty, the catalog has nothing to show", start)
        }
        Ok(n) => CheckResult::new(name, CheckStatus::Pass, format!("{n} rows"), start),
        Err(e) => CheckResult::new(name, CheckStatus::Fail, e.to_string(), start),
    }
}

fn check_ai(config: &PawmatchConfig) -> CheckResult {
    let start = Instant::now();
    match GeminiGenerator::from_config(config) {
        Ok(Some(_)) => CheckResult::new(
            "AI",
            CheckStatus::Pass,
            format!("key present, model {}", config.gemini.model),
            start,
        ),
        Ok(None) => CheckResult::new(
            "AI",
            CheckStatus::Warn,
            "no Gemini API key, AI replies will use fallback text",
            start,
        ),
        Err(e) => CheckResult::new("AI", CheckStatus::Fail, e.to_string(), start),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rendering_uses_tags() {
        let result = CheckResult {
            name: "Table pets".into(),
            status: CheckStatus::Warn,
            message: "empty".into(),
            duration: Duration::from_millis(3),
        };
        let line = render(&result, false);
        assert!(line.contains("[WARN]"));
        assert!(line.contains("Table pets"));
        assert!(line.ends_with("empty (3ms)"));
    }

    #[test]
    fn ai_check_reports_configured_model() {
        let mut config = PawmatchConfig::default();
        config.gemini.api_key = Some("test-key".into());
        let result = check_ai(&config);
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.message.contains(&config.gemini.model));
    }
}
