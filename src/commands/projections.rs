// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::currency::format_currency;
use crate::engine::final_balance;
use crate::models::{ItemKind, Projection, ProjectionItem, TxType};
use crate::store::{FinanceStore, SqliteStore};
use crate::utils::{maybe_print_json, parse_amount, parse_decimal, pretty_table};
use anyhow::{Context, Result, bail};
use serde::Serialize;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let initial_balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            let months = *sub.get_one::<u32>("months").unwrap();
            let saved = store.save_projection(&Projection {
                id: 0,
                name,
                created_at: chrono::Local::now().naive_local(),
                initial_balance,
                projection_months: months,
                incomes: Vec::new(),
                expenses: Vec::new(),
            })?;
            println!("Created projection '{}' (id {})", saved.name, saved.id);
        }
        Some(("add-item", sub)) => add_item(store, sub)?,
        Some(("rm-item", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let item = *sub.get_one::<i64>("item").unwrap();
            let mut p = load(store, id)?;
            let before = p.incomes.len() + p.expenses.len();
            p.incomes.retain(|i| i.id != item);
            p.expenses.retain(|i| i.id != item);
            if p.incomes.len() + p.expenses.len() == before {
                bail!("Item {} not found in projection {}", item, id);
            }
            store.save_projection(&p)?;
            println!("Removed item {} from projection {}", item, id);
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("run", sub)) => run(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store.delete_projection(id)?;
            println!("Removed projection {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn load(store: &SqliteStore, id: i64) -> Result<Projection> {
    store
        .get_projection(id)?
        .with_context(|| format!("Projection {} not found", id))
}

fn add_item(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let side: TxType = sub.get_one::<String>("side").unwrap().parse()?;
    let kind: ItemKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let description = sub.get_one::<String>("description").unwrap().trim();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;

    let mut p = load(store, id)?;
    let item = ProjectionItem::new(description, amount, kind);
    match side {
        TxType::Income => p.incomes.push(item),
        TxType::Expense => p.expenses.push(item),
    }
    store.save_projection(&p)?;
    println!("Added {} {} item '{}' to projection {}", kind, side, description, id);
    Ok(())
}

#[derive(Serialize)]
struct ProjectionSummary {
    id: i64,
    name: String,
    months: u32,
    initial_balance: rust_decimal::Decimal,
    final_balance: rust_decimal::Decimal,
}

fn list(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let mut summaries = Vec::new();
    for p in store.list_projections()? {
        let points = p.run()?;
        summaries.push(ProjectionSummary {
            id: p.id,
            name: p.name.clone(),
            months: p.projection_months,
            initial_balance: p.initial_balance,
            final_balance: final_balance(&points).unwrap_or(p.initial_balance),
        });
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summaries)? {
        let ccy = Settings::load(store.conn())?.base_currency;
        let rows = summaries
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.name.clone(),
                    s.months.to_string(),
                    format_currency(s.initial_balance, &ccy),
                    format_currency(s.final_balance, &ccy),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Months", "Start", "Final"], rows)
        );
    }
    Ok(())
}

fn run(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let p = load(store, *sub.get_one::<i64>("id").unwrap())?;
    let points = p.run()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        return Ok(());
    }
    let ccy = Settings::load(store.conn())?.base_currency;
    let items = p
        .incomes
        .iter()
        .map(|i| (TxType::Income, i))
        .chain(p.expenses.iter().map(|i| (TxType::Expense, i)))
        .map(|(side, i)| {
            vec![
                i.id.to_string(),
                side.to_string(),
                i.kind.to_string(),
                i.description.clone(),
                format_currency(i.amount, &ccy),
            ]
        })
        .collect();
    println!("{} (created {})", p.name, p.created_at.format("%Y-%m-%d"));
    println!(
        "{}",
        pretty_table(&["Item", "Side", "Kind", "Description", "Amount"], items)
    );
    let rows = points
        .iter()
        .map(|pt| vec![pt.month_index.to_string(), format_currency(pt.balance, &ccy)])
        .collect();
    println!("{}", pretty_table(&["Month", "Balance"], rows));
    Ok(())
}
