// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reductions over transaction snapshots: totals, category breakdowns, Pareto
//! shares, budget comparisons, upcoming events and monthly cash flow.

use crate::error::EngineError;
use crate::models::{
    Account, BudgetItem, CalendarEvent, Category, ExpenseCategory, Transaction, Transfer, TxType,
    YearMonth,
};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Number of categories kept for Pareto analysis.
pub const PARETO_TOP_N: usize = 5;

/// Share of the planned amount at which a budget line is flagged as near its limit.
pub fn default_warn_ratio() -> Decimal {
    Decimal::new(8, 1)
}

pub(crate) fn checked_add(
    a: Decimal,
    b: Decimal,
    during: &'static str,
) -> Result<Decimal, EngineError> {
    a.checked_add(b).ok_or(EngineError::AmountOverflow(during))
}

pub(crate) fn checked_sub(
    a: Decimal,
    b: Decimal,
    during: &'static str,
) -> Result<Decimal, EngineError> {
    a.checked_sub(b).ok_or(EngineError::AmountOverflow(during))
}

pub(crate) fn checked_sum(
    amounts: impl IntoIterator<Item = Decimal>,
    during: &'static str,
) -> Result<Decimal, EngineError> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, a| checked_add(acc, a, during))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

pub fn compute_totals(transactions: &[Transaction]) -> Result<Totals, EngineError> {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for t in transactions {
        match t.tx_type {
            TxType::Income => income = checked_add(income, t.amount, "summing totals")?,
            TxType::Expense => expenses = checked_add(expenses, t.amount, "summing totals")?,
        }
    }
    Ok(Totals {
        income,
        expenses,
        net: checked_sub(income, expenses, "summing totals")?,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
}

/// Totals per category for one transaction type, largest first.
/// Equal totals keep the order in which their categories were first seen.
pub fn group_by_category(
    transactions: &[Transaction],
    tx_type: TxType,
) -> Result<Vec<CategoryTotal>, EngineError> {
    let mut out: Vec<CategoryTotal> = Vec::new();
    for t in transactions.iter().filter(|t| t.tx_type == tx_type) {
        match out.iter_mut().find(|c| c.category == t.category) {
            Some(entry) => {
                entry.total = checked_add(entry.total, t.amount, "grouping categories")?;
            }
            None => out.push(CategoryTotal {
                category: t.category,
                total: t.amount,
            }),
        }
    }
    out.sort_by(|a, b| b.total.cmp(&a.total));
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParetoPoint {
    pub category: Category,
    pub total: Decimal,
    pub cumulative_percent: Decimal,
}

/// Cumulative share of the first `top_n` entries of a sorted breakdown.
/// Returns nothing when those entries sum to zero.
pub fn pareto(breakdown: &[CategoryTotal], top_n: usize) -> Result<Vec<ParetoPoint>, EngineError> {
    let top = &breakdown[..breakdown.len().min(top_n)];
    let sum = checked_sum(top.iter().map(|c| c.total), "computing pareto shares")?;
    if sum.is_zero() {
        return Ok(Vec::new());
    }
    let mut running = Decimal::ZERO;
    top.iter()
        .map(|c| -> Result<ParetoPoint, EngineError> {
            running = checked_add(running, c.total, "computing pareto shares")?;
            // the share is at most one, so scaling it by 100 cannot overflow
            let share = running / sum;
            Ok(ParetoPoint {
                category: c.category,
                total: c.total,
                cumulative_percent: share * Decimal::ONE_HUNDRED,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetLine {
    pub category: ExpenseCategory,
    pub planned: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
}

impl BudgetLine {
    /// Spending exactly the planned amount is not over budget.
    pub fn is_over_budget(&self) -> bool {
        self.remaining < Decimal::ZERO
    }
}

pub fn compare_budget(
    items: &[BudgetItem],
    transactions: &[Transaction],
    month: YearMonth,
) -> Result<Vec<BudgetLine>, EngineError> {
    tracing::debug!(%month, items = items.len(), "comparing budget");
    items
        .iter()
        .map(|item| -> Result<BudgetLine, EngineError> {
            let spent = checked_sum(
                transactions
                    .iter()
                    .filter(|t| {
                        t.tx_type == TxType::Expense
                            && t.category == Category::Expense(item.category)
                            && month.contains(t.date)
                    })
                    .map(|t| t.amount),
                "comparing budget",
            )?;
            Ok(BudgetLine {
                category: item.category,
                planned: item.planned,
                spent,
                remaining: checked_sub(item.planned, spent, "comparing budget")?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Near,
    Over,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetAlert {
    pub category: ExpenseCategory,
    pub level: AlertLevel,
    pub planned: Decimal,
    pub spent: Decimal,
}

/// Flags over-budget lines, and lines that reached `warn_ratio` of a non-zero plan.
pub fn budget_alerts(lines: &[BudgetLine], warn_ratio: Decimal) -> Vec<BudgetAlert> {
    lines
        .iter()
        .filter_map(|line| {
            let level = if line.is_over_budget() {
                AlertLevel::Over
            } else if line.planned > Decimal::ZERO && line.spent >= line.planned * warn_ratio {
                AlertLevel::Near
            } else {
                return None;
            };
            Some(BudgetAlert {
                category: line.category,
                level,
                planned: line.planned,
                spent: line.spent,
            })
        })
        .collect()
}

/// Events after `now` and no later than `now + within_days`, earliest first.
/// A window reaching past the last representable date has no upper bound.
pub fn upcoming_events(
    events: &[CalendarEvent],
    now: NaiveDate,
    within_days: u32,
) -> Vec<CalendarEvent> {
    let horizon = now
        .checked_add_days(Days::new(u64::from(within_days)))
        .unwrap_or(NaiveDate::MAX);
    let mut out: Vec<CalendarEvent> = events
        .iter()
        .filter(|e| e.date > now && e.date <= horizon)
        .cloned()
        .collect();
    out.sort_by_key(|e| e.date);
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyFlow {
    pub month: YearMonth,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

/// Income and expense buckets per calendar month, oldest first.
pub fn monthly_cashflow(transactions: &[Transaction]) -> Result<Vec<MonthlyFlow>, EngineError> {
    let mut map: BTreeMap<YearMonth, (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let entry = map
            .entry(YearMonth::of(t.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.tx_type {
            TxType::Income => entry.0 = checked_add(entry.0, t.amount, "bucketing cash flow")?,
            TxType::Expense => entry.1 = checked_add(entry.1, t.amount, "bucketing cash flow")?,
        }
    }
    map.into_iter()
        .map(|(month, (income, expenses))| -> Result<MonthlyFlow, EngineError> {
            Ok(MonthlyFlow {
                month,
                income,
                expenses,
                net: checked_sub(income, expenses, "bucketing cash flow")?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    pub account: Account,
    pub balance: Decimal,
}

pub fn account_balances(
    transactions: &[Transaction],
    transfers: &[Transfer],
) -> Result<Vec<AccountBalance>, EngineError> {
    const DURING: &str = "computing balances";
    let mut balances: HashMap<Account, Decimal> = HashMap::new();
    for t in transactions {
        let bal = balances.entry(t.account).or_insert(Decimal::ZERO);
        *bal = match t.tx_type {
            TxType::Income => checked_add(*bal, t.amount, DURING)?,
            TxType::Expense => checked_sub(*bal, t.amount, DURING)?,
        };
    }
    for tr in transfers {
        let from = balances.entry(tr.from_account).or_insert(Decimal::ZERO);
        *from = checked_sub(*from, tr.amount, DURING)?;
        let to = balances.entry(tr.to_account).or_insert(Decimal::ZERO);
        *to = checked_add(*to, tr.amount, DURING)?;
    }
    Ok(Account::ALL
        .iter()
        .map(|a| AccountBalance {
            account: *a,
            balance: balances.get(a).copied().unwrap_or(Decimal::ZERO),
        })
        .collect())
}
