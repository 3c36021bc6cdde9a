// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorize::RuleCategorizer;
use crate::commands::categorize::suggest;
use crate::config::Settings;
use crate::currency::format_currency;
use crate::engine::{Period, filter_by_period_with};
use crate::models::{Account, Category, Transaction, TxType};
use crate::store::{FinanceStore, SqliteStore};
use crate::utils::{date_or_today, maybe_print_json, parse_amount, parse_date, pretty_table};
use anyhow::{Context, Result};
use rust_decimal::Decimal;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store.delete_transaction(id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Runs the configured categorizers; falls back to the "other" category of the type.
pub fn suggest_category(
    store: &SqliteStore,
    description: &str,
    amount: Decimal,
    tx_type: TxType,
) -> Result<Category> {
    match suggest(store, description, amount, tx_type)? {
        Some(s) => {
            println!(
                "Suggested category {} (confidence {:.2})",
                s.category, s.confidence
            );
            Ok(s.category)
        }
        None => Ok(Category::other(tx_type)),
    }
}

fn add(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let mut description = sub.get_one::<String>("description").unwrap().trim().to_string();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let account: Account = sub.get_one::<String>("account").unwrap().parse()?;
    let tx_type = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TxType>())
        .transpose()?;

    let category = match sub.get_one::<String>("category") {
        Some(c) => c.parse::<Category>()?,
        None => {
            let tx_type = tx_type.context("--type is required when --category is omitted")?;
            let (_, rewrite) = RuleCategorizer::load(store.conn())?.apply(&description);
            if let Some(newd) = rewrite.filter(|d| d != &description) {
                println!("Description rewritten: {} -> {}", description, newd);
                description = newd;
            }
            suggest_category(store, &description, amount, tx_type)?
        }
    };

    let mut tx = Transaction::new(date, description, amount, category, account);
    if let Some(t) = tx_type {
        tx.tx_type = t;
    }
    let saved = store.create_transaction(&tx)?;
    println!(
        "Recorded {} {} on {} '{}' [{}] (id {})",
        saved.tx_type, saved.amount, saved.date, saved.description, saved.category, saved.id
    );
    Ok(())
}

fn edit(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut tx = store
        .get_transaction(id)?
        .with_context(|| format!("Transaction {} not found", id))?;
    if let Some(d) = sub.get_one::<String>("date") {
        tx.date = parse_date(d)?;
    }
    if let Some(d) = sub.get_one::<String>("description") {
        tx.description = d.trim().to_string();
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        tx.amount = parse_amount(a)?;
    }
    if let Some(c) = sub.get_one::<String>("category") {
        tx.category = c.parse()?;
        tx.tx_type = tx.category.tx_type();
    }
    if let Some(a) = sub.get_one::<String>("account") {
        tx.account = a.parse()?;
    }
    store.update_transaction(&tx)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn list(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let ccy = Settings::load(store.conn())?.base_currency;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.description.clone(),
                    t.tx_type.to_string(),
                    t.category.to_string(),
                    t.account.to_string(),
                    format_currency(t.amount, &ccy),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Description", "Type", "Category", "Account", "Amount"],
                rows,
            )
        );
    }
    Ok(())
}

/// Transactions matching the list filters, newest first.
pub fn query_rows(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let mut data = store.list_transactions()?;

    if let Some(p) = sub.get_one::<String>("period") {
        let period: Period = p.parse()?;
        let reference = date_or_today(sub.get_one::<String>("date"))?;
        let week_start = Settings::load(store.conn())?.week_start;
        data = filter_by_period_with(&data, period, reference, week_start);
    }
    if let Some(t) = sub.get_one::<String>("type") {
        let tx_type: TxType = t.parse()?;
        data.retain(|tx| tx.tx_type == tx_type);
    }
    if let Some(c) = sub.get_one::<String>("category") {
        let category: Category = c.parse()?;
        data.retain(|tx| tx.category == category);
    }
    if let Some(a) = sub.get_one::<String>("account") {
        let account: Account = a.parse()?;
        data.retain(|tx| tx.account == account);
    }

    data.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}
