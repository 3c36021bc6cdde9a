// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorize::{CategorizationRequest, Categorizer, ChainCategorizer, Suggestion};
use crate::config::Settings;
use crate::models::TxType;
use crate::store::{FinanceStore, SqliteStore};
use crate::utils::{maybe_print_json, parse_amount};
use anyhow::Result;
use rust_decimal::Decimal;

/// Runs the standard categorizer chain against the stored rules, history and endpoint.
pub fn suggest(
    store: &SqliteStore,
    description: &str,
    amount: Decimal,
    tx_type: TxType,
) -> Result<Option<Suggestion>> {
    let settings = Settings::load(store.conn())?;
    let history = store.list_transactions()?;
    let chain = ChainCategorizer::standard(store.conn(), settings.ai_endpoint.as_deref())?;
    chain.suggest(&CategorizationRequest {
        description,
        amount,
        tx_type,
        history: &history,
    })
}

pub fn suggestion(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<Option<Suggestion>> {
    let description = sub.get_one::<String>("description").unwrap().trim();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let tx_type: TxType = sub.get_one::<String>("type").unwrap().parse()?;
    suggest(store, description, amount, tx_type)
}

pub fn handle(store: &SqliteStore, sub: &clap::ArgMatches) -> Result<()> {
    let s = suggestion(store, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    match s {
        Some(s) => println!("{} (confidence {:.2})", s.category, s.confidence),
        None => println!("No suggestion"),
    }
    Ok(())
}
