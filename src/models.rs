// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ValidationError;
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Declares a closed, text-backed enum with `as_str`, `FromStr`, `Display` and `ALL`.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ValidationError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(
    /// Direction of a transaction. Amounts are always non-negative; the sign lives here.
    TxType, "transaction type" {
        Income => "income",
        Expense => "expense",
    }
);

text_enum!(
    IncomeCategory, "income category" {
        Salary => "salary",
        Freelance => "freelance",
        Investments => "investments",
        Gifts => "gifts",
        OtherIncome => "other_income",
    }
);

text_enum!(
    ExpenseCategory, "expense category" {
        Housing => "housing",
        Food => "food",
        Transport => "transport",
        Utilities => "utilities",
        Health => "health",
        Entertainment => "entertainment",
        Shopping => "shopping",
        Education => "education",
        OtherExpense => "other_expense",
    }
);

text_enum!(
    Account, "account" {
        Checking => "checking",
        Savings => "savings",
        Cash => "cash",
        CreditCard => "credit_card",
        Investment => "investment",
    }
);

text_enum!(
    /// How a projection line item recurs over the projected months.
    ItemKind, "projection item kind" {
        Once => "once",
        Recurring => "recurring",
    }
);

/// A transaction category, grouped by the transaction type it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Income(IncomeCategory),
    Expense(ExpenseCategory),
}

impl Category {
    pub fn tx_type(&self) -> TxType {
        match self {
            Category::Income(_) => TxType::Income,
            Category::Expense(_) => TxType::Expense,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Income(c) => c.as_str(),
            Category::Expense(c) => c.as_str(),
        }
    }

    /// Fallback category used when nothing better is known.
    pub fn other(tx_type: TxType) -> Self {
        match tx_type {
            TxType::Income => Category::Income(IncomeCategory::OtherIncome),
            TxType::Expense => Category::Expense(ExpenseCategory::OtherExpense),
        }
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(c) = s.parse::<IncomeCategory>() {
            return Ok(Category::Income(c));
        }
        if let Ok(c) = s.parse::<ExpenseCategory>() {
            return Ok(Category::Expense(c));
        }
        Err(ValidationError::UnknownVariant {
            kind: "category",
            value: s.to_string(),
        })
    }
}

impl TryFrom<String> for Category {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar month, stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        YearMonth(date - Days::new(u64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.0 + Months::new(1) - Days::new(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let first = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("Invalid month '{}', expected YYYY-MM", s))?;
        Ok(YearMonth(first))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn ensure_non_negative(amount: Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::NegativeAmount(amount.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub category: Category,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub account: Account,
}

impl Transaction {
    /// Builds an unsaved transaction; the type follows the category group.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        category: Category,
        account: Account,
    ) -> Self {
        Self {
            id: 0,
            date,
            description: description.into(),
            amount,
            category,
            tx_type: category.tx_type(),
            account,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_negative(self.amount)?;
        if self.category.tx_type() != self.tx_type {
            return Err(ValidationError::CategoryMismatch {
                category: self.category.to_string(),
                tx_type: self.tx_type.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub from_account: Account,
    pub to_account: Account,
}

impl Transfer {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        from_account: Account,
        to_account: Account,
    ) -> Self {
        Self {
            id: 0,
            date,
            description: description.into(),
            amount,
            from_account,
            to_account,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveTransfer(self.amount.to_string()));
        }
        if self.from_account == self.to_account {
            return Err(ValidationError::SameAccountTransfer(
                self.from_account.to_string(),
            ));
        }
        Ok(())
    }
}

/// Planned spend for one expense category within a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub category: ExpenseCategory,
    pub planned: Decimal,
}

impl BudgetItem {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_negative(self.planned)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
}

impl CalendarEvent {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: 0,
            date,
            description: description.into(),
            amount,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_negative(self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionItem {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub kind: ItemKind,
}

impl ProjectionItem {
    pub fn new(description: impl Into<String>, amount: Decimal, kind: ItemKind) -> Self {
        Self {
            id: 0,
            description: description.into(),
            amount,
            kind,
        }
    }
}

pub const MAX_PROJECTION_MONTHS: u32 = 60;

/// A saved projection scenario. Saving replaces the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub id: i64,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub initial_balance: Decimal,
    pub projection_months: u32,
    pub incomes: Vec<ProjectionItem>,
    pub expenses: Vec<ProjectionItem>,
}

impl Projection {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !(1..=MAX_PROJECTION_MONTHS).contains(&self.projection_months) {
            return Err(ValidationError::ProjectionMonthsOutOfRange(i64::from(
                self.projection_months,
            )));
        }
        for item in self.incomes.iter().chain(self.expenses.iter()) {
            ensure_non_negative(item.amount)?;
        }
        Ok(())
    }
}
