// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketplan::categorize::{
    CategorizationRequest, Categorizer, ChainCategorizer, HistoryCategorizer, RemoteCategorizer,
    RuleCategorizer, add_rule, remove_rule,
};
use pocketplan::config::set_setting;
use pocketplan::models::{Account, Category, ExpenseCategory, IncomeCategory, Transaction, TxType};
use pocketplan::store::SqliteStore;
use pocketplan::{cli, commands};
use rust_decimal::Decimal;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

fn past(desc: &str, category: Category) -> Transaction {
    Transaction::new(
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        desc,
        Decimal::from(20),
        category,
        Account::Checking,
    )
}

fn request<'a>(description: &'a str, tx_type: TxType, history: &'a [Transaction]) -> CategorizationRequest<'a> {
    CategorizationRequest {
        description,
        amount: Decimal::from(20),
        tx_type,
        history,
    }
}

#[test]
fn newest_matching_rule_wins() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_rule(
        store.conn(),
        "(?i)uber",
        Some(Category::Expense(ExpenseCategory::Transport)),
        None,
    )
    .unwrap();
    add_rule(
        store.conn(),
        "(?i)uber eats",
        Some(Category::Expense(ExpenseCategory::Food)),
        Some("Uber Eats"),
    )
    .unwrap();
    let rules = RuleCategorizer::load(store.conn()).unwrap();
    assert_eq!(rules.rules().len(), 2);

    let (cat, rewrite) = rules.apply("UBER EATS 1234");
    assert_eq!(cat, Some(Category::Expense(ExpenseCategory::Food)));
    assert_eq!(rewrite.as_deref(), Some("Uber Eats"));

    let s = rules
        .suggest(&request("Uber trip", TxType::Expense, &[]))
        .unwrap()
        .unwrap();
    assert_eq!(s.category, Category::Expense(ExpenseCategory::Transport));
    assert_eq!(s.confidence, 1.0);
    assert_eq!(rules.apply("bakery"), (None, None));
}

#[test]
fn invalid_pattern_is_rejected_and_removal_checks_id() {
    let store = SqliteStore::open_in_memory().unwrap();
    let err = add_rule(store.conn(), "([unclosed", None, None).unwrap_err();
    assert!(err.to_string().starts_with("Invalid regex pattern '([unclosed'"));

    let id = add_rule(store.conn(), "coffee", None, Some("Coffee")).unwrap();
    remove_rule(store.conn(), id).unwrap();
    assert!(remove_rule(store.conn(), id).is_err());
}

#[test]
fn rule_suggestion_for_the_wrong_type_is_discarded() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_rule(
        store.conn(),
        "(?i)refund",
        Some(Category::Income(IncomeCategory::Gifts)),
        None,
    )
    .unwrap();
    let rules = RuleCategorizer::load(store.conn()).unwrap();
    assert!(
        rules
            .suggest(&request("Refund shoes", TxType::Expense, &[]))
            .unwrap()
            .is_none()
    );
}

#[test]
fn older_rule_of_the_requested_type_is_still_found() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_rule(
        store.conn(),
        "(?i)amazon",
        Some(Category::Expense(ExpenseCategory::Shopping)),
        None,
    )
    .unwrap();
    add_rule(
        store.conn(),
        "(?i)amazon",
        Some(Category::Income(IncomeCategory::OtherIncome)),
        None,
    )
    .unwrap();
    let rules = RuleCategorizer::load(store.conn()).unwrap();

    let s = rules
        .suggest(&request("AMAZON order", TxType::Expense, &[]))
        .unwrap()
        .unwrap();
    assert_eq!(s.category, Category::Expense(ExpenseCategory::Shopping));
    let s = rules
        .suggest(&request("Amazon refund", TxType::Income, &[]))
        .unwrap()
        .unwrap();
    assert_eq!(s.category, Category::Income(IncomeCategory::OtherIncome));
}

#[test]
fn history_picks_the_most_frequent_category() {
    let history = vec![
        past("Store 102", Category::Expense(ExpenseCategory::Shopping)),
        past("store 88", Category::Expense(ExpenseCategory::Food)),
        past("STORE", Category::Expense(ExpenseCategory::Food)),
        past("store", Category::Income(IncomeCategory::OtherIncome)),
        past("Other place", Category::Expense(ExpenseCategory::Health)),
    ];
    let s = HistoryCategorizer
        .suggest(&request("Store 7", TxType::Expense, &history))
        .unwrap()
        .unwrap();
    assert_eq!(s.category, Category::Expense(ExpenseCategory::Food));
    assert!((s.confidence - 2.0 / 3.0).abs() < 1e-9);

    assert!(
        HistoryCategorizer
            .suggest(&request("never seen", TxType::Expense, &history))
            .unwrap()
            .is_none()
    );
}

#[test]
fn chain_falls_through_in_order() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_rule(
        store.conn(),
        "^Gym",
        Some(Category::Expense(ExpenseCategory::Health)),
        None,
    )
    .unwrap();
    let history = vec![past("Bookshop", Category::Expense(ExpenseCategory::Education))];
    let chain = ChainCategorizer::standard(store.conn(), None).unwrap();

    let by_rule = chain
        .suggest(&request("Gym monthly", TxType::Expense, &history))
        .unwrap()
        .unwrap();
    assert_eq!(by_rule.category, Category::Expense(ExpenseCategory::Health));

    let by_history = chain
        .suggest(&request("bookshop", TxType::Expense, &history))
        .unwrap()
        .unwrap();
    assert_eq!(by_history.category, Category::Expense(ExpenseCategory::Education));

    assert!(
        chain
            .suggest(&request("unknown", TxType::Expense, &history))
            .unwrap()
            .is_none()
    );
}

/// Serves one HTTP request with `reply` and hands back the request body.
fn one_shot_server(reply: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/suggest", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (mut sock, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let body = loop {
            let n = sock.read(&mut chunk).unwrap();
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(split) = text.find("\r\n\r\n") {
                let len = text[..split]
                    .lines()
                    .find_map(|l| {
                        let lower = l.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if buf.len() >= split + 4 + len {
                    break text[split + 4..split + 4 + len].to_string();
                }
            }
            if n == 0 {
                break String::new();
            }
        };
        let resp = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            reply.len(),
            reply
        );
        sock.write_all(resp.as_bytes()).unwrap();
        let _ = tx.send(body);
    });
    (url, rx)
}

#[test]
fn remote_categorizer_posts_context_and_reads_reply() {
    let (url, rx) = one_shot_server(r#"{"category":"utilities","confidence":0.72}"#);
    let history = vec![past("Power co", Category::Expense(ExpenseCategory::Utilities))];
    let remote = RemoteCategorizer::new(url).unwrap();
    let s = remote
        .suggest(&request("City Water", TxType::Expense, &history))
        .unwrap()
        .unwrap();
    assert_eq!(s.category, Category::Expense(ExpenseCategory::Utilities));
    assert!((s.confidence - 0.72).abs() < 1e-9);

    let sent: serde_json::Value = serde_json::from_str(&rx.recv().unwrap()).unwrap();
    assert_eq!(sent["description"], "City Water");
    assert_eq!(sent["type"], "expense");
    assert_eq!(sent["history"][0]["category"], "utilities");
}

#[test]
fn remote_unknown_category_is_no_suggestion() {
    let (url, _rx) = one_shot_server(r#"{"category":"crypto","confidence":0.9}"#);
    let remote = RemoteCategorizer::new(url).unwrap();
    assert!(
        remote
            .suggest(&request("Coin", TxType::Expense, &[]))
            .unwrap()
            .is_none()
    );
}

#[test]
fn categorize_command_uses_configured_endpoint() {
    let (url, _rx) = one_shot_server(r#"{"category":"freelance","confidence":0.5}"#);
    let store = SqliteStore::open_in_memory().unwrap();
    set_setting(store.conn(), "ai_endpoint", &url).unwrap();
    let matches = cli::build_cli().get_matches_from([
        "pocketplan",
        "categorize",
        "--description",
        "Client invoice",
        "--type",
        "income",
    ]);
    let Some(("categorize", sub)) = matches.subcommand() else {
        panic!("no categorize subcommand");
    };
    let s = commands::categorize::suggestion(&store, sub).unwrap().unwrap();
    assert_eq!(s.category, Category::Income(IncomeCategory::Freelance));
}

#[test]
fn shared_suggest_matches_the_categorize_command() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_rule(
        store.conn(),
        "(?i)payroll",
        Some(Category::Income(IncomeCategory::Salary)),
        None,
    )
    .unwrap();
    let direct = commands::categorize::suggest(&store, "ACME payroll", Decimal::from(20), TxType::Income)
        .unwrap()
        .unwrap();
    assert_eq!(direct.category, Category::Income(IncomeCategory::Salary));

    let matches = cli::build_cli().get_matches_from([
        "pocketplan",
        "categorize",
        "--description",
        "ACME payroll",
        "--type",
        "income",
    ]);
    let Some(("categorize", sub)) = matches.subcommand() else {
        panic!("no categorize subcommand");
    };
    assert_eq!(commands::categorize::suggestion(&store, sub).unwrap(), Some(direct));
    assert!(
        commands::categorize::suggest(&store, "ACME payroll", Decimal::from(20), TxType::Expense)
            .unwrap()
            .is_none()
    );
}
