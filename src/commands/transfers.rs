// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::currency::format_currency;
use crate::engine::{Period, filter_by_period_with};
use crate::models::{Account, Transfer};
use crate::store::{FinanceStore, SqliteStore};
use crate::utils::{date_or_today, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            let description = sub.get_one::<String>("description").unwrap().trim();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let from: Account = sub.get_one::<String>("from").unwrap().parse()?;
            let to: Account = sub.get_one::<String>("to").unwrap().parse()?;
            let saved = store.create_transfer(&Transfer::new(date, description, amount, from, to))?;
            println!(
                "Moved {} from {} to {} on {} (id {})",
                saved.amount, saved.from_account, saved.to_account, saved.date, saved.id
            );
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store.delete_transfer(id)?;
            println!("Removed transfer {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn list(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(store.conn())?;
    let mut data = store.list_transfers()?;
    if !sub.get_flag("all") {
        let period: Period = sub.get_one::<String>("period").unwrap().parse()?;
        let reference = date_or_today(sub.get_one::<String>("date"))?;
        data = filter_by_period_with(&data, period, reference, settings.week_start);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.description.clone(),
                    t.from_account.to_string(),
                    t.to_account.to_string(),
                    format_currency(t.amount, &settings.base_currency),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Description", "From", "To", "Amount"], rows)
        );
    }
    Ok(())
}
