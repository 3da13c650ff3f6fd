//! Usage and billing records
//!
//! Usage probes never fail outright. Whatever goes wrong ends up in
//! [`UsageInfo::details`] so a caller can always render one row per provider.

use chrono::{DateTime, Datelike, LocalResult, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::provider::Provider;

pub const DETAIL_KEY_INVALID: &str = "API key invalid";
pub const DETAIL_OPENAI_KEY_VALID: &str = "Key valid • Usage: check platform.openai.com";
pub const DETAIL_OPENAI_MONTH: &str = "This month's usage";
pub const DETAIL_GEMINI_FREE_TIER: &str = "Free tier: 60 req/min, 1500/day";
pub const DETAIL_DEEPSEEK_BALANCE: &str = "Available balance";

/// Best-effort usage report for one provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageInfo {
    pub provider: String,
    pub total_used: f64,
    pub limit: Option<f64>,
    /// "USD", "CNY", "requests", ...
    pub unit: String,
    pub details: Option<String>,
}

impl UsageInfo {
    pub fn new(provider: Provider, total_used: f64, details: impl Into<String>) -> Self {
        Self {
            provider: provider.display_name().to_string(),
            total_used,
            limit: None,
            unit: unit_for(provider).to_string(),
            details: Some(details.into()),
        }
    }

    /// Record for a probe whose request could not be completed
    pub fn unavailable(provider: Provider, reason: impl std::fmt::Display) -> Self {
        Self::new(provider, 0.0, format!("Unable to fetch: {}", reason))
    }

    /// Share of the limit consumed, when a limit is known
    pub fn fraction_used(&self) -> Option<f64> {
        self.limit
            .filter(|limit| *limit > 0.0)
            .map(|limit| self.total_used / limit)
    }
}

pub fn unit_for(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAi => "USD",
        Provider::Gemini => "requests",
        Provider::DeepSeek => "CNY",
    }
}

/// Unix-second bounds of the calendar month containing `now`, ending at `now`
pub fn month_window<Tz: TimeZone>(now: &DateTime<Tz>) -> (i64, i64) {
    let local = now
        .timezone()
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0);
    (month_start(local, now.year(), now.month()), now.timestamp())
}

/// Local midnight on the 1st, or UTC midnight when it falls in a DST gap
fn month_start<Tz: TimeZone>(local: LocalResult<DateTime<Tz>>, year: i32, month: u32) -> i64 {
    match local.earliest() {
        Some(start) => start.timestamp(),
        None => Utc
            .with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .earliest()
            .map(|start| start.timestamp())
            .unwrap_or_default(),
    }
}

/// Sum `data[].results[].amount` of an OpenAI costs page, in cents.
///
/// Missing or non-numeric amounts count as zero.
pub fn sum_cost_cents(json: &Value) -> f64 {
    json.get("data")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|bucket| bucket.get("results").and_then(Value::as_array))
        .flatten()
        .filter_map(|result| result.get("amount").and_then(Value::as_f64))
        .sum()
}

/// Sum `balance_infos[].total_balance`, which DeepSeek sends as strings.
///
/// Unparseable balances count as zero.
pub fn sum_balances(json: &Value) -> f64 {
    json.get("balance_infos")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|info| info.get("total_balance").and_then(Value::as_str))
        .map(|balance| balance.trim().parse::<f64>().unwrap_or(0.0))
        .sum()
}
