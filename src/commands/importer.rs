// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorize::RuleCategorizer;
use crate::models::{Account, Category, Transaction, TxType};
use crate::store::SqliteStore;
use crate::utils::{parse_amount, parse_date};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use std::io::Read;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let file = std::fs::File::open(path).with_context(|| format!("Open CSV {}", path))?;
            let count = import_transactions(store, file)?;
            println!("Imported {} transactions from {}", count, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Reads `date,description,amount,type,category,account` rows and stores them
/// in one database transaction. Rule rewrites always apply; rule categories
/// only fill rows that leave the category empty.
pub fn import_transactions<R: Read>(store: &SqliteStore, input: R) -> Result<usize> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(input);
    let rules = RuleCategorizer::load(store.conn())?;
    let mut txs = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim();
        let mut description = rec.get(1).context("description missing")?.trim().to_string();
        let amount_raw = rec.get(2).context("amount missing")?.trim();
        let type_raw = rec.get(3).unwrap_or("").trim();
        let category_raw = rec.get(4).unwrap_or("").trim();
        let account_raw = rec.get(5).unwrap_or("").trim();

        let date = parse_date(date_raw).with_context(|| format!("Row {}: bad date", line))?;
        let amount = parse_amount(amount_raw)
            .with_context(|| format!("Row {}: bad amount for '{}'", line, description))?;
        let tx_type = if type_raw.is_empty() {
            None
        } else {
            Some(
                type_raw
                    .parse::<TxType>()
                    .with_context(|| format!("Row {}", line))?,
            )
        };
        let account = if account_raw.is_empty() {
            Account::Checking
        } else {
            account_raw
                .parse::<Account>()
                .with_context(|| format!("Row {}", line))?
        };

        let (rule_cat, rewrite) = rules.apply(&description);
        if let Some(newd) = rewrite {
            description = newd;
        }
        let category = if category_raw.is_empty() {
            let tx_type =
                tx_type.ok_or_else(|| anyhow!("Row {}: type is required without a category", line))?;
            rule_cat
                .filter(|c| c.tx_type() == tx_type)
                .unwrap_or(Category::other(tx_type))
        } else {
            category_raw
                .parse::<Category>()
                .with_context(|| format!("Row {}", line))?
        };

        let mut tx = Transaction::new(date, description, amount, category, account);
        if let Some(t) = tx_type {
            tx.tx_type = t;
        }
        tx.validate().with_context(|| format!("Row {}", line))?;
        txs.push(tx);
    }

    store.import_transactions(&txs)
}
