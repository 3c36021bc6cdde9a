// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Data access for every record kind. The engine only ever sees the snapshots
//! returned from here; all validation of incoming records happens here too.

use crate::db;
use crate::models::{
    BudgetItem, CalendarEvent, ExpenseCategory, Projection, ProjectionItem, Transaction, Transfer,
    YearMonth,
};
use crate::utils::parse_date;
use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// CRUD over snapshots of the user's finance records.
pub trait FinanceStore {
    fn list_transactions(&self) -> Result<Vec<Transaction>>;
    fn get_transaction(&self, id: i64) -> Result<Option<Transaction>>;
    fn create_transaction(&self, tx: &Transaction) -> Result<Transaction>;
    fn update_transaction(&self, tx: &Transaction) -> Result<()>;
    fn delete_transaction(&self, id: i64) -> Result<()>;

    fn list_transfers(&self) -> Result<Vec<Transfer>>;
    fn create_transfer(&self, transfer: &Transfer) -> Result<Transfer>;
    fn update_transfer(&self, transfer: &Transfer) -> Result<()>;
    fn delete_transfer(&self, id: i64) -> Result<()>;

    fn list_budget_items(&self, month: YearMonth) -> Result<Vec<BudgetItem>>;
    fn set_budget_item(&self, month: YearMonth, item: &BudgetItem) -> Result<()>;
    fn delete_budget_item(&self, month: YearMonth, category: ExpenseCategory) -> Result<()>;

    fn list_calendar_events(&self) -> Result<Vec<CalendarEvent>>;
    fn create_calendar_event(&self, event: &CalendarEvent) -> Result<CalendarEvent>;
    fn update_calendar_event(&self, event: &CalendarEvent) -> Result<()>;
    fn delete_calendar_event(&self, id: i64) -> Result<()>;

    fn list_projections(&self) -> Result<Vec<Projection>>;
    fn get_projection(&self, id: i64) -> Result<Option<Projection>>;
    /// Inserts when `id == 0`, otherwise replaces the stored projection and all its items.
    fn save_projection(&self, projection: &Projection) -> Result<Projection>;
    fn delete_projection(&self, id: i64) -> Result<()>;
}

pub struct SqliteStore {
    conn: Connection,
}

fn parse_money(s: &str, what: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}' in {}", s, what))
}

fn ensure_changed(changed: usize, what: &str, id: i64) -> Result<()> {
    if changed == 0 {
        bail!("{} {} not found", what, id);
    }
    Ok(())
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Result<Self> {
        db::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self {
            conn: db::open_or_init()?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Inserts a batch of transactions atomically; either all are stored or none.
    pub fn import_transactions(&self, txs: &[Transaction]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for t in txs {
            t.validate()?;
            insert_transaction(&tx, t)?;
        }
        tx.commit()?;
        tracing::info!(count = txs.len(), "imported transactions");
        Ok(txs.len())
    }

    fn load_items(&self, projection_id: i64, side: &str) -> Result<Vec<ProjectionItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, amount, kind FROM projection_items
             WHERE projection_id=?1 AND side=?2 ORDER BY position, id",
        )?;
        let mut rows = stmt.query(params![projection_id, side])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let amount: String = r.get(2)?;
            let kind: String = r.get(3)?;
            out.push(ProjectionItem {
                id: r.get(0)?,
                description: r.get(1)?,
                amount: parse_money(&amount, "projection_items")?,
                kind: kind.parse()?,
            });
        }
        Ok(out)
    }

    fn projection_from_head(
        &self,
        head: (i64, String, String, String, i64),
    ) -> Result<Projection> {
        let (id, name, created_at, initial_balance, months) = head;
        Ok(Projection {
            id,
            name,
            created_at: NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT)
                .with_context(|| format!("Invalid timestamp '{}' for projection {}", created_at, id))?,
            initial_balance: parse_money(&initial_balance, "projections")?,
            projection_months: u32::try_from(months)
                .with_context(|| format!("Invalid month count {} for projection {}", months, id))?,
            incomes: self.load_items(id, "income")?,
            expenses: self.load_items(id, "expense")?,
        })
    }
}

fn insert_transaction(conn: &Connection, t: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(date, description, amount, category, type, account)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            t.date.to_string(),
            t.description,
            t.amount.to_string(),
            t.category.as_str(),
            t.tx_type.as_str(),
            t.account.as_str()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_items(
    conn: &Connection,
    projection_id: i64,
    side: &str,
    items: &[ProjectionItem],
) -> Result<()> {
    for (pos, item) in items.iter().enumerate() {
        conn.execute(
            "INSERT INTO projection_items(projection_id, side, position, description, amount, kind)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                projection_id,
                side,
                pos as i64,
                item.description,
                item.amount.to_string(),
                item.kind.as_str()
            ],
        )?;
    }
    Ok(())
}

fn read_transaction(r: &rusqlite::Row<'_>) -> Result<Transaction> {
    let date: String = r.get(1)?;
    let amount: String = r.get(3)?;
    let category: String = r.get(4)?;
    let tx_type: String = r.get(5)?;
    let account: String = r.get(6)?;
    Ok(Transaction {
        id: r.get(0)?,
        date: parse_date(&date)?,
        description: r.get(2)?,
        amount: parse_money(&amount, "transactions")?,
        category: category.parse()?,
        tx_type: tx_type.parse()?,
        account: account.parse()?,
    })
}

impl FinanceStore for SqliteStore {
    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, description, amount, category, type, account
             FROM transactions ORDER BY date, id",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(read_transaction(r)?);
        }
        Ok(out)
    }

    fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, description, amount, category, type, account
             FROM transactions WHERE id=?1",
        )?;
        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(r) => Ok(Some(read_transaction(r)?)),
            None => Ok(None),
        }
    }

    fn create_transaction(&self, tx: &Transaction) -> Result<Transaction> {
        tx.validate()?;
        let id = insert_transaction(&self.conn, tx)?;
        tracing::info!(id, amount = %tx.amount, category = %tx.category, "transaction created");
        Ok(Transaction { id, ..tx.clone() })
    }

    fn update_transaction(&self, tx: &Transaction) -> Result<()> {
        tx.validate()?;
        let changed = self.conn.execute(
            "UPDATE transactions SET date=?1, description=?2, amount=?3, category=?4, type=?5, account=?6
             WHERE id=?7",
            params![
                tx.date.to_string(),
                tx.description,
                tx.amount.to_string(),
                tx.category.as_str(),
                tx.tx_type.as_str(),
                tx.account.as_str(),
                tx.id
            ],
        )?;
        ensure_changed(changed, "Transaction", tx.id)?;
        tracing::info!(id = tx.id, "transaction updated");
        Ok(())
    }

    fn delete_transaction(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        ensure_changed(changed, "Transaction", id)?;
        tracing::info!(id, "transaction deleted");
        Ok(())
    }

    fn list_transfers(&self) -> Result<Vec<Transfer>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, description, amount, from_account, to_account
             FROM transfers ORDER BY date, id",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let date: String = r.get(1)?;
            let amount: String = r.get(3)?;
            let from: String = r.get(4)?;
            let to: String = r.get(5)?;
            out.push(Transfer {
                id: r.get(0)?,
                date: parse_date(&date)?,
                description: r.get(2)?,
                amount: parse_money(&amount, "transfers")?,
                from_account: from.parse()?,
                to_account: to.parse()?,
            });
        }
        Ok(out)
    }

    fn create_transfer(&self, transfer: &Transfer) -> Result<Transfer> {
        transfer.validate()?;
        self.conn.execute(
            "INSERT INTO transfers(date, description, amount, from_account, to_account)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                transfer.date.to_string(),
                transfer.description,
                transfer.amount.to_string(),
                transfer.from_account.as_str(),
                transfer.to_account.as_str()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, from = %transfer.from_account, to = %transfer.to_account, "transfer created");
        Ok(Transfer {
            id,
            ..transfer.clone()
        })
    }

    fn update_transfer(&self, transfer: &Transfer) -> Result<()> {
        transfer.validate()?;
        let changed = self.conn.execute(
            "UPDATE transfers SET date=?1, description=?2, amount=?3, from_account=?4, to_account=?5
             WHERE id=?6",
            params![
                transfer.date.to_string(),
                transfer.description,
                transfer.amount.to_string(),
                transfer.from_account.as_str(),
                transfer.to_account.as_str(),
                transfer.id
            ],
        )?;
        ensure_changed(changed, "Transfer", transfer.id)
    }

    fn delete_transfer(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM transfers WHERE id=?1", params![id])?;
        ensure_changed(changed, "Transfer", id)?;
        tracing::info!(id, "transfer deleted");
        Ok(())
    }

    fn list_budget_items(&self, month: YearMonth) -> Result<Vec<BudgetItem>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, planned FROM budgets WHERE month=?1 ORDER BY category")?;
        let mut rows = stmt.query(params![month.to_string()])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let category: String = r.get(0)?;
            let planned: String = r.get(1)?;
            out.push(BudgetItem {
                category: category.parse()?,
                planned: parse_money(&planned, "budgets")?,
            });
        }
        Ok(out)
    }

    fn set_budget_item(&self, month: YearMonth, item: &BudgetItem) -> Result<()> {
        item.validate()?;
        self.conn.execute(
            "INSERT INTO budgets(month, category, planned) VALUES (?1,?2,?3)
             ON CONFLICT(month, category) DO UPDATE SET planned=excluded.planned",
            params![month.to_string(), item.category.as_str(), item.planned.to_string()],
        )?;
        tracing::info!(%month, category = %item.category, planned = %item.planned, "budget set");
        Ok(())
    }

    fn delete_budget_item(&self, month: YearMonth, category: ExpenseCategory) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM budgets WHERE month=?1 AND category=?2",
            params![month.to_string(), category.as_str()],
        )?;
        if changed == 0 {
            bail!("No budget for {} in {}", category, month);
        }
        Ok(())
    }

    fn list_calendar_events(&self) -> Result<Vec<CalendarEvent>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, date, description, amount FROM calendar_events ORDER BY date, id")?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            let date: String = r.get(1)?;
            let amount: String = r.get(3)?;
            out.push(CalendarEvent {
                id: r.get(0)?,
                date: parse_date(&date)?,
                description: r.get(2)?,
                amount: parse_money(&amount, "calendar_events")?,
            });
        }
        Ok(out)
    }

    fn create_calendar_event(&self, event: &CalendarEvent) -> Result<CalendarEvent> {
        event.validate()?;
        self.conn.execute(
            "INSERT INTO calendar_events(date, description, amount) VALUES (?1, ?2, ?3)",
            params![
                event.date.to_string(),
                event.description,
                event.amount.to_string()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, date = %event.date, "calendar event created");
        Ok(CalendarEvent {
            id,
            ..event.clone()
        })
    }

    fn update_calendar_event(&self, event: &CalendarEvent) -> Result<()> {
        event.validate()?;
        let changed = self.conn.execute(
            "UPDATE calendar_events SET date=?1, description=?2, amount=?3 WHERE id=?4",
            params![
                event.date.to_string(),
                event.description,
                event.amount.to_string(),
                event.id
            ],
        )?;
        ensure_changed(changed, "Event", event.id)
    }

    fn delete_calendar_event(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM calendar_events WHERE id=?1", params![id])?;
        ensure_changed(changed, "Event", id)
    }

    fn list_projections(&self) -> Result<Vec<Projection>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at, initial_balance, months FROM projections ORDER BY id",
        )?;
        let heads = stmt
            .query_map([], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
            })?
            .collect::<rusqlite::Result<Vec<(i64, String, String, String, i64)>>>()?;
        heads
            .into_iter()
            .map(|h| self.projection_from_head(h))
            .collect()
    }

    fn get_projection(&self, id: i64) -> Result<Option<Projection>> {
        let head: Option<(i64, String, String, String, i64)> = self
            .conn
            .query_row(
                "SELECT id, name, created_at, initial_balance, months FROM projections WHERE id=?1",
                params![id],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
            )
            .optional()?;
        head.map(|h| self.projection_from_head(h)).transpose()
    }

    fn save_projection(&self, projection: &Projection) -> Result<Projection> {
        projection.validate()?;
        let tx = self.conn.unchecked_transaction()?;
        let created_at = projection.created_at.format(TIMESTAMP_FORMAT).to_string();
        let id = if projection.id == 0 {
            tx.execute(
                "INSERT INTO projections(name, created_at, initial_balance, months)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    projection.name,
                    created_at,
                    projection.initial_balance.to_string(),
                    projection.projection_months
                ],
            )?;
            tx.last_insert_rowid()
        } else {
            let changed = tx.execute(
                "UPDATE projections SET name=?1, created_at=?2, initial_balance=?3, months=?4
                 WHERE id=?5",
                params![
                    projection.name,
                    created_at,
                    projection.initial_balance.to_string(),
                    projection.projection_months,
                    projection.id
                ],
            )?;
            ensure_changed(changed, "Projection", projection.id)?;
            tx.execute(
                "DELETE FROM projection_items WHERE projection_id=?1",
                params![projection.id],
            )?;
            projection.id
        };
        insert_items(&tx, id, "income", &projection.incomes)?;
        insert_items(&tx, id, "expense", &projection.expenses)?;
        tx.commit()?;
        tracing::info!(id, name = %projection.name, "projection saved");
        self.get_projection(id)?
            .with_context(|| format!("Projection {} vanished after save", id))
    }

    fn delete_projection(&self, id: i64) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM projection_items WHERE projection_id=?1",
            params![id],
        )?;
        let changed = tx.execute("DELETE FROM projections WHERE id=?1", params![id])?;
        ensure_changed(changed, "Projection", id)?;
        tx.commit()?;
        tracing::info!(id, "projection deleted");
        Ok(())
    }
}
