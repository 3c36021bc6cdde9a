// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categorize::{RuleCategorizer, add_rule, remove_rule};
use crate::models::Category;
use crate::store::SqliteStore;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    let conn = store.conn();
    match m.subcommand() {
        Some(("add", sub)) => {
            let pattern = sub.get_one::<String>("pattern").unwrap().trim();
            let category = sub
                .get_one::<String>("category")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<Category>())
                .transpose()?;
            let rewrite = sub
                .get_one::<String>("description_rewrite")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty());
            let id = add_rule(conn, pattern, category, rewrite)?;
            println!(
                "Added rule {}: /{}/ -> category {:?}, rewrite {:?}",
                id,
                pattern,
                category.map(|c| c.as_str()),
                rewrite
            );
        }
        Some(("list", _)) => {
            let rules = RuleCategorizer::load(conn)?;
            let data = rules
                .rules()
                .iter()
                .map(|r| {
                    vec![
                        r.id.to_string(),
                        r.pattern.as_str().to_string(),
                        r.category.map(|c| c.to_string()).unwrap_or_default(),
                        r.rewrite.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["ID", "Pattern", "Category", "Rewrite"], data)
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            remove_rule(conn, id)?;
            println!("Removed rule {}", id);
        }
        _ => {}
    }
    Ok(())
}
