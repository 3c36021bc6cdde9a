// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure aggregation and projection over immutable snapshots. Nothing here
//! reads the clock or touches storage; callers pass the reference date in.

pub mod aggregate;
pub mod period;
pub mod projection;

pub use aggregate::{
    AccountBalance, AlertLevel, BudgetAlert, BudgetLine, CategoryTotal, MonthlyFlow, PARETO_TOP_N,
    ParetoPoint, Totals, account_balances, budget_alerts, compare_budget, compute_totals,
    default_warn_ratio, group_by_category, monthly_cashflow, pareto, upcoming_events,
};
pub use period::{Dated, Period, WeekStart, filter_by_period, filter_by_period_with};
pub use projection::{ProjectionPoint, final_balance, project};
