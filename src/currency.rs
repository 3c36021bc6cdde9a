// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::{Decimal, RoundingStrategy};

fn symbol_for(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "BRL" => Some("R$"),
        "INR" => Some("₹"),
        _ => None,
    }
}

fn minor_digits(code: &str) -> u32 {
    match code {
        "JPY" => 0,
        _ => 2,
    }
}

fn group_thousands(int_part: &str) -> String {
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Display string for an amount: `$1,234.50`, `-€3.00`, `¥1,200`, `12.00 CHF`.
pub fn format_currency(amount: Decimal, code: &str) -> String {
    let code = code.trim().to_uppercase();
    let dp = minor_digits(&code);
    let rounded = amount
        .abs()
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.prec$}", rounded, prec = dp as usize);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };
    let mut body = group_thousands(int_part);
    if let Some(f) = frac_part {
        body.push('.');
        body.push_str(f);
    }
    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match symbol_for(&code) {
        Some(sym) => format!("{}{}{}", sign, sym, body),
        None => format!("{}{} {}", sign, body, code),
    }
}
