// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketplan::categorize::add_rule;
use pocketplan::models::{Account, Category, ExpenseCategory, IncomeCategory, Transaction, TxType};
use pocketplan::store::{FinanceStore, SqliteStore};
use pocketplan::{cli, commands::transactions};
use rust_decimal::Decimal;

fn setup() -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    for i in 1..=3 {
        store
            .create_transaction(&Transaction::new(
                NaiveDate::from_ymd_opt(2025, 1, i).unwrap(),
                "Corner shop",
                Decimal::from(10),
                Category::Expense(ExpenseCategory::Food),
                Account::Checking,
            ))
            .unwrap();
    }
    store
        .create_transaction(&Transaction::new(
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            "Payroll",
            Decimal::from(3000),
            Category::Income(IncomeCategory::Salary),
            Account::Savings,
        ))
        .unwrap();
    store
}

fn run_tx(store: &SqliteStore, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["pocketplan", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => transactions::handle(store, tx_m),
        _ => panic!("no tx subcommand"),
    }
}

fn list_rows(store: &SqliteStore, args: &[&str]) -> Vec<Transaction> {
    let mut argv = vec!["pocketplan", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return transactions::query_rows(store, list_m).unwrap();
        }
    }
    panic!("no tx list subcommand");
}

#[test]
fn list_limit_respected() {
    let store = setup();
    let rows = list_rows(&store, &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date.to_string(), "2025-02-01");
    assert_eq!(rows[1].date.to_string(), "2025-01-03");
}

#[test]
fn list_filters_combine() {
    let store = setup();
    assert_eq!(list_rows(&store, &["--type", "expense"]).len(), 3);
    assert_eq!(list_rows(&store, &["--account", "savings"]).len(), 1);
    assert_eq!(list_rows(&store, &["--category", "salary"]).len(), 1);
    let january = list_rows(&store, &["--period", "month", "--date", "2025-01-15"]);
    assert_eq!(january.len(), 3);
    assert!(january.iter().all(|t| t.tx_type == TxType::Expense));
}

#[test]
fn list_rejects_unknown_period() {
    let store = setup();
    let matches = cli::build_cli().get_matches_from(["pocketplan", "tx", "list", "--period", "decade"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    let err = transactions::query_rows(&store, list_m).unwrap_err();
    assert!(err.to_string().contains("Invalid period 'decade'"));
}

#[test]
fn add_with_explicit_category() {
    let store = SqliteStore::open_in_memory().unwrap();
    run_tx(
        &store,
        &[
            "add",
            "--date",
            "2025-03-01",
            "--description",
            "  Train ticket ",
            "--amount",
            "12.40",
            "--category",
            "transport",
            "--account",
            "cash",
        ],
    )
    .unwrap();
    let all = store.list_transactions().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].description, "Train ticket");
    assert_eq!(all[0].amount, "12.40".parse::<Decimal>().unwrap());
    assert_eq!(all[0].tx_type, TxType::Expense);
    assert_eq!(all[0].account, Account::Cash);
}

#[test]
fn add_without_category_uses_rules_then_fallback() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_rule(
        store.conn(),
        "(?i)netflix",
        Some(Category::Expense(ExpenseCategory::Entertainment)),
        Some("Netflix"),
    )
    .unwrap();
    run_tx(
        &store,
        &[
            "add", "--date", "2025-03-02", "--description", "NETFLIX.COM 8812", "--amount", "15.99",
            "--type", "expense",
        ],
    )
    .unwrap();
    run_tx(
        &store,
        &[
            "add", "--date", "2025-03-03", "--description", "Mystery", "--amount", "4", "--type",
            "expense",
        ],
    )
    .unwrap();
    let all = store.list_transactions().unwrap();
    assert_eq!(all[0].description, "Netflix");
    assert_eq!(all[0].category, Category::Expense(ExpenseCategory::Entertainment));
    assert_eq!(all[1].category, Category::other(TxType::Expense));
}

#[test]
fn add_rejects_mismatched_type_and_missing_type() {
    let store = SqliteStore::open_in_memory().unwrap();
    let err = run_tx(
        &store,
        &[
            "add", "--date", "2025-03-01", "--description", "x", "--amount", "1", "--category",
            "salary", "--type", "expense",
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("not valid"));
    assert!(
        run_tx(
            &store,
            &["add", "--date", "2025-03-01", "--description", "x", "--amount", "1"],
        )
        .is_err()
    );
    assert!(
        run_tx(
            &store,
            &[
                "add", "--date", "2025-03-01", "--description", "x", "--amount=-1", "--category",
                "food",
            ],
        )
        .is_err()
    );
    assert!(store.list_transactions().unwrap().is_empty());
}

#[test]
fn edit_category_moves_type_and_rm_deletes() {
    let store = setup();
    run_tx(&store, &["edit", "--id", "1", "--category", "gifts", "--amount", "11"]).unwrap();
    let tx = store.get_transaction(1).unwrap().unwrap();
    assert_eq!(tx.category, Category::Income(IncomeCategory::Gifts));
    assert_eq!(tx.tx_type, TxType::Income);
    assert_eq!(tx.amount, Decimal::from(11));

    run_tx(&store, &["rm", "--id", "1"]).unwrap();
    assert!(store.get_transaction(1).unwrap().is_none());
    assert!(run_tx(&store, &["rm", "--id", "1"]).is_err());
    assert!(run_tx(&store, &["edit", "--id", "99", "--amount", "1"]).is_err());
}
