// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Settings, set_setting};
use crate::store::SqliteStore;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(store: &SqliteStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let s = Settings::load(store.conn())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
                let rows = vec![
                    vec!["base_currency".into(), s.base_currency.clone()],
                    vec!["week_start".into(), s.week_start.as_str().to_string()],
                    vec!["budget_warn_ratio".into(), s.budget_warn_ratio.to_string()],
                    vec![
                        "ai_endpoint".into(),
                        s.ai_endpoint.clone().unwrap_or_default(),
                    ],
                ];
                println!("{}", pretty_table(&["Key", "Value"], rows));
            }
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap();
            let stored = set_setting(store.conn(), key, value)?;
            println!("{} set to {}", key, stored);
        }
        _ => {}
    }
    Ok(())
}
