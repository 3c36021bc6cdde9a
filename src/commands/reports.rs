// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::currency::format_currency;
use crate::engine::{
    CategoryTotal, ParetoPoint, Period, Totals, account_balances, compute_totals,
    filter_by_period_with, group_by_category, monthly_cashflow, pareto,
};
use crate::models::{Transaction, TxType};
use crate::store::{FinanceStore, SqliteStore};
use crate::utils::{date_or_today, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("totals", sub)) => totals(store, sub)?,
        Some(("categories", sub)) => categories(store, sub)?,
        Some(("pareto", sub)) => pareto_report(store, sub)?,
        Some(("cashflow", sub)) => cashflow(store, sub)?,
        Some(("balances", sub)) => balances(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// Transactions inside the `--period` window around `--date`.
pub fn period_transactions(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let period: Period = sub.get_one::<String>("period").unwrap().parse()?;
    let reference = date_or_today(sub.get_one::<String>("date"))?;
    let week_start = Settings::load(store.conn())?.week_start;
    Ok(filter_by_period_with(
        &store.list_transactions()?,
        period,
        reference,
        week_start,
    ))
}

pub fn period_totals(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<Totals> {
    Ok(compute_totals(&period_transactions(store, sub)?)?)
}

pub fn period_categories(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<Vec<CategoryTotal>> {
    let tx_type: TxType = sub
        .get_one::<String>("type")
        .map(|s| s.as_str())
        .unwrap_or("expense")
        .parse()?;
    Ok(group_by_category(&period_transactions(store, sub)?, tx_type)?)
}

pub fn period_pareto(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<Vec<ParetoPoint>> {
    let top = *sub.get_one::<usize>("top").unwrap();
    let breakdown = group_by_category(&period_transactions(store, sub)?, TxType::Expense)?;
    Ok(pareto(&breakdown, top)?)
}

fn totals(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let t = period_totals(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        let ccy = Settings::load(store.conn())?.base_currency;
        let rows = vec![vec![
            format_currency(t.income, &ccy),
            format_currency(t.expenses, &ccy),
            format_currency(t.net, &ccy),
        ]];
        println!("{}", pretty_table(&["Income", "Expenses", "Net"], rows));
    }
    Ok(())
}

fn categories(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = period_categories(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = Settings::load(store.conn())?.base_currency;
        let rows = data
            .iter()
            .map(|c| vec![c.category.to_string(), format_currency(c.total, &ccy)])
            .collect();
        println!("{}", pretty_table(&["Category", "Total"], rows));
    }
    Ok(())
}

fn pareto_report(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = period_pareto(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = Settings::load(store.conn())?.base_currency;
        let rows = data
            .iter()
            .map(|p| {
                vec![
                    p.category.to_string(),
                    format_currency(p.total, &ccy),
                    format!("{:.1}%", p.cumulative_percent),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Cumulative"], rows));
    }
    Ok(())
}

fn cashflow(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let flows = monthly_cashflow(&store.list_transactions()?)?;
    let recent: Vec<_> = flows.into_iter().rev().take(months).collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &recent)? {
        let ccy = Settings::load(store.conn())?.base_currency;
        let rows = recent
            .iter()
            .map(|f| {
                vec![
                    f.month.to_string(),
                    format_currency(f.income, &ccy),
                    format_currency(f.expenses, &ccy),
                    format_currency(f.net, &ccy),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], rows)
        );
    }
    Ok(())
}

fn balances(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = account_balances(&store.list_transactions()?, &store.list_transfers()?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = Settings::load(store.conn())?.base_currency;
        let rows = data
            .iter()
            .map(|b| vec![b.account.to_string(), format_currency(b.balance, &ccy)])
            .collect();
        println!("{}", pretty_table(&["Account", "Balance"], rows));
    }
    Ok(())
}
