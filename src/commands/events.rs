// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::currency::format_currency;
use crate::engine::upcoming_events;
use crate::models::CalendarEvent;
use crate::store::{FinanceStore, SqliteStore};
use crate::utils::{date_or_today, maybe_print_json, parse_amount, parse_date, pretty_table};
use anyhow::Result;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            let description = sub.get_one::<String>("description").unwrap().trim();
            let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
            let saved = store.create_calendar_event(&CalendarEvent::new(date, description, amount))?;
            println!("Planned '{}' on {} (id {})", saved.description, saved.date, saved.id);
        }
        Some(("list", sub)) => {
            let events = store.list_calendar_events()?;
            print_events(store, sub, &events)?;
        }
        Some(("upcoming", sub)) => {
            let now = date_or_today(sub.get_one::<String>("date"))?;
            let days = *sub.get_one::<u32>("days").unwrap();
            let events = upcoming_events(&store.list_calendar_events()?, now, days);
            print_events(store, sub, &events)?;
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            store.delete_calendar_event(id)?;
            println!("Removed event {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn print_events(store: &SqliteStore, sub: &clap::ArgMatches, events: &[CalendarEvent]) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &events)? {
        return Ok(());
    }
    let ccy = Settings::load(store.conn())?.base_currency;
    let rows = events
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.date.to_string(),
                e.description.clone(),
                format_currency(e.amount, &ccy),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["ID", "Date", "Description", "Amount"], rows));
    Ok(())
}
