// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::currency::format_currency;
use crate::engine::{AlertLevel, BudgetAlert, BudgetLine, budget_alerts, compare_budget};
use crate::models::{BudgetItem, ExpenseCategory, YearMonth};
use crate::store::{FinanceStore, SqliteStore};
use crate::utils::{maybe_print_json, parse_amount, parse_month, pretty_table};
use anyhow::Result;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => {
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            let cat: ExpenseCategory = sub.get_one::<String>("category").unwrap().parse()?;
            store.delete_budget_item(month, cat)?;
            println!("Removed budget for {} / {}", month, cat);
        }
        Some(("report", sub)) => report(store, sub)?,
        Some(("alerts", sub)) => alerts(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let category: ExpenseCategory = sub.get_one::<String>("category").unwrap().parse()?;
    let planned = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    store.set_budget_item(month, &BudgetItem { category, planned })?;
    println!("Budget set for {} / {} = {}", month, category, planned);
    Ok(())
}

fn list(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let items = store.list_budget_items(month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        let ccy = Settings::load(store.conn())?.base_currency;
        let data = items
            .iter()
            .map(|i| {
                vec![
                    month.to_string(),
                    i.category.to_string(),
                    format_currency(i.planned, &ccy),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Category", "Planned"], data));
    }
    Ok(())
}

/// Budget-vs-spend lines for a month from the stored snapshot.
pub fn month_lines(store: &SqliteStore, month: YearMonth) -> Result<Vec<BudgetLine>> {
    let items = store.list_budget_items(month)?;
    let transactions = store.list_transactions()?;
    Ok(compare_budget(&items, &transactions, month)?)
}

fn report(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let lines = month_lines(store, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &lines)? {
        let ccy = Settings::load(store.conn())?.base_currency;
        let data = lines
            .iter()
            .map(|l| {
                vec![
                    l.category.to_string(),
                    format_currency(l.planned, &ccy),
                    format_currency(l.spent, &ccy),
                    format_currency(l.remaining, &ccy),
                    if l.is_over_budget() { "OVER" } else { "ok" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Planned", "Spent", "Remaining", "Status"],
                data
            )
        );
    }
    Ok(())
}

/// Alerts for a month using the configured warn ratio.
pub fn month_alerts(store: &SqliteStore, month: YearMonth) -> Result<Vec<BudgetAlert>> {
    let settings = Settings::load(store.conn())?;
    let lines = month_lines(store, month)?;
    Ok(budget_alerts(&lines, settings.budget_warn_ratio))
}

fn alerts(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let alerts = month_alerts(store, month)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &alerts)? {
        return Ok(());
    }
    if alerts.is_empty() {
        println!("No budget alerts for {}", month);
        return Ok(());
    }
    let ccy = Settings::load(store.conn())?.base_currency;
    let data = alerts
        .iter()
        .map(|a| {
            let level = match a.level {
                AlertLevel::Over => "over budget",
                AlertLevel::Near => "near limit",
            };
            vec![
                a.category.to_string(),
                level.to_string(),
                format_currency(a.spent, &ccy),
                format_currency(a.planned, &ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Alert", "Spent", "Planned"], data)
    );
    Ok(())
}
