// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Errors raised by the aggregation and projection engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid period '{0}', expected week|month|quarter|year")]
    InvalidPeriod(String),

    #[error("Invalid projection range {0}: month count must not be negative")]
    InvalidProjectionRange(i64),

    #[error("Amount overflow while {0}")]
    AmountOverflow(&'static str),
}

/// Rejections raised at the data-access boundary before a record is stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Amount must not be negative (got {0})")]
    NegativeAmount(String),

    #[error("Transfer amount must be positive (got {0})")]
    NonPositiveTransfer(String),

    #[error("Transfer source and destination are both '{0}'")]
    SameAccountTransfer(String),

    #[error("Category '{category}' is not valid for a {tx_type} transaction")]
    CategoryMismatch { category: String, tx_type: String },

    #[error("Projection months {0} outside allowed range 1-60")]
    ProjectionMonthsOutOfRange(i64),

    #[error("Projection name must not be empty")]
    EmptyName,

    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}
