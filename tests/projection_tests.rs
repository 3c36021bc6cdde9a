// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketplan::engine::{ProjectionPoint, final_balance, project};
use pocketplan::error::EngineError;
use pocketplan::models::{ItemKind, Projection, ProjectionItem};
use rust_decimal::Decimal;

fn item(amount: i64, kind: ItemKind) -> ProjectionItem {
    ProjectionItem::new("item", Decimal::from(amount), kind)
}

fn points(pairs: &[(i64, i64)]) -> Vec<ProjectionPoint> {
    pairs
        .iter()
        .map(|&(month_index, b)| ProjectionPoint {
            month_index,
            balance: Decimal::from(b),
        })
        .collect()
}

#[test]
fn zero_months_yields_only_the_start() {
    let out = project(Decimal::from(1000), 0, &[], &[]).unwrap();
    assert_eq!(out, points(&[(0, 1000)]));
}

#[test]
fn recurring_income_accumulates() {
    let out = project(Decimal::ZERO, 3, &[item(100, ItemKind::Recurring)], &[]).unwrap();
    assert_eq!(out, points(&[(0, 0), (1, 100), (2, 200), (3, 300)]));
}

#[test]
fn once_items_apply_in_first_month_only() {
    let out = project(
        Decimal::from(500),
        2,
        &[item(200, ItemKind::Once)],
        &[item(50, ItemKind::Recurring)],
    )
    .unwrap();
    assert_eq!(out, points(&[(0, 500), (1, 650), (2, 600)]));
    assert_eq!(final_balance(&out), Some(Decimal::from(600)));
}

#[test]
fn negative_month_count_is_rejected() {
    let err = project(Decimal::ZERO, -1, &[], &[]).unwrap_err();
    assert_eq!(err, EngineError::InvalidProjectionRange(-1));
}

#[test]
fn saved_projection_runs_over_its_own_horizon() {
    let p = Projection {
        id: 7,
        name: "Sabbatical".into(),
        created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
        initial_balance: Decimal::from(10_000),
        projection_months: 6,
        incomes: vec![],
        expenses: vec![item(1_500, ItemKind::Recurring), item(800, ItemKind::Once)],
    };
    let out = p.run().unwrap();
    assert_eq!(out.len(), 7);
    assert_eq!(out[1].balance, Decimal::from(7_700));
    assert_eq!(final_balance(&out), Some(Decimal::from(200)));
}

#[test]
fn projection_validation_bounds() {
    let mut p = Projection {
        id: 0,
        name: "Plan".into(),
        created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        initial_balance: Decimal::ZERO,
        projection_months: 60,
        incomes: vec![],
        expenses: vec![],
    };
    assert!(p.validate().is_ok());
    p.projection_months = 61;
    assert!(p.validate().is_err());
    p.projection_months = 0;
    assert!(p.validate().is_err());
    p.projection_months = 12;
    p.name = "  ".into();
    assert!(p.validate().is_err());
}

#[test]
fn balance_beyond_decimal_range_is_an_error() {
    let max = ProjectionItem::new("windfall", Decimal::MAX, ItemKind::Recurring);
    let err = project(Decimal::ZERO, 2, &[max.clone()], &[]).unwrap_err();
    assert!(matches!(err, EngineError::AmountOverflow(_)));
    // an expense cancelling the income keeps the balance in range
    let out = project(Decimal::ZERO, 2, &[max.clone()], &[max]).unwrap();
    assert_eq!(final_balance(&out), Some(Decimal::ZERO));
}
