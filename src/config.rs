// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User settings persisted in the `settings` key/value table.

use crate::engine::{WeekStart, default_warn_ratio};
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub const KEY_BASE_CURRENCY: &str = "base_currency";
pub const KEY_WEEK_START: &str = "week_start";
pub const KEY_WARN_RATIO: &str = "budget_warn_ratio";
pub const KEY_AI_ENDPOINT: &str = "ai_endpoint";

pub const KNOWN_KEYS: &[&str] = &[
    KEY_BASE_CURRENCY,
    KEY_WEEK_START,
    KEY_WARN_RATIO,
    KEY_AI_ENDPOINT,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub base_currency: String,
    pub week_start: WeekStart,
    pub budget_warn_ratio: Decimal,
    pub ai_endpoint: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_currency: "USD".into(),
            week_start: WeekStart::Monday,
            budget_warn_ratio: default_warn_ratio(),
            ai_endpoint: None,
        }
    }
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut s = Settings::default();
        if let Some(v) = get_setting(conn, KEY_BASE_CURRENCY)? {
            s.base_currency = v;
        }
        if let Some(v) = get_setting(conn, KEY_WEEK_START)? {
            s.week_start = v
                .parse()
                .with_context(|| format!("Stored setting {} is invalid", KEY_WEEK_START))?;
        }
        if let Some(v) = get_setting(conn, KEY_WARN_RATIO)? {
            s.budget_warn_ratio = v
                .parse()
                .with_context(|| format!("Stored setting {} is invalid", KEY_WARN_RATIO))?;
        }
        s.ai_endpoint = get_setting(conn, KEY_AI_ENDPOINT)?.filter(|v| !v.is_empty());
        Ok(s)
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

/// Validates and stores a setting, returning the normalized value written.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    let normalized = match key {
        KEY_BASE_CURRENCY => {
            if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("Invalid currency code '{}', expected three letters", value);
            }
            value.to_uppercase()
        }
        KEY_WEEK_START => value.parse::<WeekStart>()?.as_str().to_string(),
        KEY_WARN_RATIO => {
            let ratio = value
                .parse::<Decimal>()
                .with_context(|| format!("Invalid ratio '{}'", value))?;
            if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
                bail!("Warn ratio must be in (0, 1], got {}", ratio);
            }
            ratio.to_string()
        }
        KEY_AI_ENDPOINT => value.to_string(),
        _ => bail!(
            "Unknown setting '{}' (known: {})",
            key,
            KNOWN_KEYS.join(", ")
        ),
    };
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, normalized],
    )?;
    tracing::info!(key, value = %normalized, "setting updated");
    Ok(normalized)
}
