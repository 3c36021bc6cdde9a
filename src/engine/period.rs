// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar period windows and the filter that selects records inside them.

use crate::error::{EngineError, ValidationError};
use crate::models::{CalendarEvent, Transaction, Transfer, YearMonth};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named calendar window anchored at a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
        }
    }

    /// Inclusive `[start, end]` bounds of the period containing `reference`.
    pub fn bounds(&self, reference: NaiveDate, week_start: WeekStart) -> (NaiveDate, NaiveDate) {
        match self {
            Period::Week => {
                let back = match week_start {
                    WeekStart::Monday => reference.weekday().num_days_from_monday(),
                    WeekStart::Sunday => reference.weekday().num_days_from_sunday(),
                };
                let start = reference - Days::new(u64::from(back));
                (start, start + Days::new(6))
            }
            Period::Month => {
                let month = YearMonth::of(reference);
                (month.first_day(), month.last_day())
            }
            Period::Quarter => {
                let start = YearMonth::of(reference).first_day() - Months::new(reference.month0() % 3);
                (start, start + Months::new(3) - Days::new(1))
            }
            Period::Year => {
                let start = YearMonth::of(reference).first_day() - Months::new(reference.month0());
                (start, start + Months::new(12) - Days::new(1))
            }
        }
    }
}

impl FromStr for Period {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" | "weekly" => Ok(Period::Week),
            "month" | "monthly" => Ok(Period::Month),
            "quarter" | "quarterly" => Ok(Period::Quarter),
            "year" | "yearly" => Ok(Period::Year),
            _ => Err(EngineError::InvalidPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First day of the week used by [`Period::Week`]. Defaults to Monday (ISO 8601).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekStart::Monday => "monday",
            WeekStart::Sunday => "sunday",
        }
    }
}

impl FromStr for WeekStart {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(WeekStart::Monday),
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            _ => Err(ValidationError::UnknownVariant {
                kind: "week start",
                value: s.to_string(),
            }),
        }
    }
}

/// Anything carrying a calendar date the period filter can select on.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for Transaction {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for Transfer {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for CalendarEvent {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Records dated inside the period containing `reference`, with weeks starting on Monday.
pub fn filter_by_period<T: Dated + Clone>(records: &[T], period: Period, reference: NaiveDate) -> Vec<T> {
    filter_by_period_with(records, period, reference, WeekStart::default())
}

pub fn filter_by_period_with<T: Dated + Clone>(
    records: &[T],
    period: Period,
    reference: NaiveDate,
    week_start: WeekStart,
) -> Vec<T> {
    let (start, end) = period.bounds(reference, week_start);
    tracing::debug!(%period, %start, %end, total = records.len(), "filtering by period");
    records
        .iter()
        .filter(|r| {
            let d = r.date();
            d >= start && d <= end
        })
        .cloned()
        .collect()
}
