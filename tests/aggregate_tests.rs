// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketplan::engine::{
    PARETO_TOP_N, Totals, account_balances, compute_totals, group_by_category, monthly_cashflow,
    pareto, upcoming_events,
};
use pocketplan::error::EngineError;
use pocketplan::models::{
    Account, CalendarEvent, Category, ExpenseCategory, IncomeCategory, Transaction, Transfer,
    TxType,
};
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn expense(cat: ExpenseCategory, amount: &str) -> Transaction {
    Transaction::new(
        d(2025, 8, 5),
        "x",
        dec(amount),
        Category::Expense(cat),
        Account::Checking,
    )
}

fn income(cat: IncomeCategory, amount: &str) -> Transaction {
    Transaction::new(
        d(2025, 8, 1),
        "pay",
        dec(amount),
        Category::Income(cat),
        Account::Checking,
    )
}

#[test]
fn totals_of_empty_set_are_zero() {
    assert_eq!(compute_totals(&[]).unwrap(), Totals::default());
    let t = compute_totals(&[]).unwrap();
    assert!(t.income.is_zero() && t.expenses.is_zero() && t.net.is_zero());
}

#[test]
fn totals_net_is_exact() {
    let txs: Vec<Transaction> = (0..1000)
        .map(|i| {
            if i % 3 == 0 {
                income(IncomeCategory::Freelance, "0.10")
            } else {
                expense(ExpenseCategory::Food, "0.20")
            }
        })
        .collect();
    let t = compute_totals(&txs).unwrap();
    assert_eq!(t.income, dec("33.40"));
    assert_eq!(t.expenses, dec("133.20"));
    assert_eq!(t.net, t.income - t.expenses);
    assert_eq!(t.net, dec("-99.80"));
}

#[test]
fn group_by_category_sorts_descending_with_stable_ties() {
    let txs = vec![
        expense(ExpenseCategory::Transport, "30"),
        expense(ExpenseCategory::Food, "50"),
        expense(ExpenseCategory::Health, "30"),
        expense(ExpenseCategory::Food, "25"),
        income(IncomeCategory::Salary, "1000"),
    ];
    let out = group_by_category(&txs, TxType::Expense).unwrap();
    let cats: Vec<_> = out.iter().map(|c| c.category).collect();
    assert_eq!(
        cats,
        vec![
            Category::Expense(ExpenseCategory::Food),
            Category::Expense(ExpenseCategory::Transport),
            Category::Expense(ExpenseCategory::Health),
        ]
    );
    assert_eq!(out[0].total, dec("75"));
    let sum: Decimal = out.iter().map(|c| c.total).sum();
    assert_eq!(sum, compute_totals(&txs).unwrap().expenses);
}

#[test]
fn pareto_cumulative_reaches_one_hundred() {
    let txs = vec![
        expense(ExpenseCategory::Housing, "900"),
        expense(ExpenseCategory::Food, "300"),
        expense(ExpenseCategory::Transport, "100"),
        expense(ExpenseCategory::Health, "70"),
        expense(ExpenseCategory::Shopping, "20"),
        expense(ExpenseCategory::Education, "10"),
    ];
    let breakdown = group_by_category(&txs, TxType::Expense).unwrap();
    let points = pareto(&breakdown, PARETO_TOP_N).unwrap();
    assert_eq!(points.len(), 5);
    assert_eq!(points[0].category, Category::Expense(ExpenseCategory::Housing));
    // top five sum to 1390
    let first = points[0].cumulative_percent;
    assert!((first - dec("64.7482014388")).abs() < dec("0.000000001"));
    let last = points.last().unwrap().cumulative_percent;
    assert!((last - Decimal::ONE_HUNDRED).abs() < dec("0.000000001"));
    for w in points.windows(2) {
        assert!(w[0].cumulative_percent <= w[1].cumulative_percent);
    }
}

#[test]
fn pareto_of_zero_totals_is_empty() {
    let txs = vec![
        expense(ExpenseCategory::Food, "0"),
        expense(ExpenseCategory::Transport, "0"),
    ];
    let breakdown = group_by_category(&txs, TxType::Expense).unwrap();
    assert_eq!(breakdown.len(), 2);
    assert!(pareto(&breakdown, PARETO_TOP_N).unwrap().is_empty());
    assert!(pareto(&[], PARETO_TOP_N).unwrap().is_empty());
}

#[test]
fn upcoming_events_bounds() {
    let now = d(2025, 8, 10);
    let events = vec![
        CalendarEvent::new(d(2025, 9, 9), "edge", dec("1")),
        CalendarEvent::new(now, "today", dec("2")),
        CalendarEvent::new(d(2025, 8, 11), "tomorrow", dec("3")),
        CalendarEvent::new(d(2025, 9, 10), "too far", dec("4")),
        CalendarEvent::new(d(2025, 8, 1), "past", dec("5")),
    ];
    let out = upcoming_events(&events, now, 30);
    let names: Vec<_> = out.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(names, vec!["tomorrow", "edge"]);
}

#[test]
fn cashflow_buckets_by_month() {
    let mut a = income(IncomeCategory::Salary, "1000");
    a.date = d(2025, 7, 31);
    let mut b = expense(ExpenseCategory::Housing, "400");
    b.date = d(2025, 7, 1);
    let c = expense(ExpenseCategory::Food, "50");
    let flows = monthly_cashflow(&[c, a, b]).unwrap();
    assert_eq!(flows.len(), 2);
    assert_eq!(flows[0].month.to_string(), "2025-07");
    assert_eq!(flows[0].net, dec("600"));
    assert_eq!(flows[1].month.to_string(), "2025-08");
    assert_eq!(flows[1].expenses, dec("50"));
}

#[test]
fn transfers_move_balance_without_touching_totals() {
    let txs = vec![
        income(IncomeCategory::Salary, "2000"),
        expense(ExpenseCategory::Utilities, "150"),
    ];
    let transfers = vec![Transfer::new(
        d(2025, 8, 2),
        "save",
        dec("500"),
        Account::Checking,
        Account::Savings,
    )];
    let balances = account_balances(&txs, &transfers).unwrap();
    let get = |a: Account| balances.iter().find(|b| b.account == a).unwrap().balance;
    assert_eq!(get(Account::Checking), dec("1350"));
    assert_eq!(get(Account::Savings), dec("500"));
    assert_eq!(get(Account::Cash), Decimal::ZERO);
    let total: Decimal = balances.iter().map(|b| b.balance).sum();
    assert_eq!(total, compute_totals(&txs).unwrap().net);
}

#[test]
fn upcoming_window_past_the_calendar_end_is_unbounded() {
    let now = d(2025, 8, 10);
    let events = vec![
        CalendarEvent::new(d(2025, 9, 1), "insurance", dec("300")),
        CalendarEvent::new(d(2025, 8, 9), "past", dec("5")),
    ];
    let out = upcoming_events(&events, now, u32::MAX);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].description, "insurance");
}

#[test]
fn sums_beyond_decimal_range_are_errors() {
    let mut big = income(IncomeCategory::Salary, "1");
    big.amount = Decimal::MAX;
    let txs = vec![big.clone(), big];
    assert!(matches!(
        compute_totals(&txs),
        Err(EngineError::AmountOverflow(_))
    ));
    assert!(monthly_cashflow(&txs).is_err());
    assert!(account_balances(&txs, &[]).is_err());
    assert!(group_by_category(&txs, TxType::Income).is_err());

    let mut huge = expense(ExpenseCategory::Food, "1");
    huge.amount = Decimal::MAX;
    let mut other = expense(ExpenseCategory::Housing, "1");
    other.amount = Decimal::MAX;
    let breakdown = group_by_category(&[huge, other], TxType::Expense).unwrap();
    assert!(pareto(&breakdown, PARETO_TOP_N).is_err());
}
