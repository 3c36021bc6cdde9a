// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Linear month-by-month balance projection.
//!
//! Recurring items apply in every projected month; one-time items apply once,
//! in the first projected month. There is no compounding and no per-item
//! start date.

use crate::engine::aggregate::{checked_add, checked_sub, checked_sum};
use crate::error::EngineError;
use crate::models::{ItemKind, Projection, ProjectionItem};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectionPoint {
    pub month_index: i64,
    pub balance: Decimal,
}

fn contribution(items: &[ProjectionItem], month_index: i64) -> Result<Decimal, EngineError> {
    checked_sum(
        items
            .iter()
            .filter(|i| match i.kind {
                ItemKind::Recurring => true,
                ItemKind::Once => month_index == 1,
            })
            .map(|i| i.amount),
        "projecting balance",
    )
}

/// Balance trajectory of `months + 1` points; index 0 is the starting balance.
/// A balance leaving the `Decimal` range is an [`EngineError::AmountOverflow`].
pub fn project(
    initial_balance: Decimal,
    months: i64,
    incomes: &[ProjectionItem],
    expenses: &[ProjectionItem],
) -> Result<Vec<ProjectionPoint>, EngineError> {
    if months < 0 {
        return Err(EngineError::InvalidProjectionRange(months));
    }
    tracing::debug!(
        months,
        incomes = incomes.len(),
        expenses = expenses.len(),
        "running projection"
    );
    let mut points = vec![ProjectionPoint {
        month_index: 0,
        balance: initial_balance,
    }];
    let mut balance = initial_balance;
    for month_index in 1..=months {
        let net = checked_sub(
            contribution(incomes, month_index)?,
            contribution(expenses, month_index)?,
            "projecting balance",
        )?;
        balance = checked_add(balance, net, "projecting balance")?;
        points.push(ProjectionPoint {
            month_index,
            balance,
        });
    }
    Ok(points)
}

pub fn final_balance(points: &[ProjectionPoint]) -> Option<Decimal> {
    points.last().map(|p| p.balance)
}

impl Projection {
    pub fn run(&self) -> Result<Vec<ProjectionPoint>, EngineError> {
        project(
            self.initial_balance,
            i64::from(self.projection_months),
            &self.incomes,
            &self.expenses,
        )
    }
}
