// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Category suggestions for new transactions: stored regex rules, the user's own
//! history, and an optional remote assistant endpoint.

use crate::models::{Category, Transaction, TxType};
use crate::utils::{http_client, normalize_description};
use anyhow::{Context, Result, anyhow};
use regex::Regex;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Past transactions sent to the remote assistant as context.
const REMOTE_HISTORY_LIMIT: usize = 20;

pub struct CategorizationRequest<'a> {
    pub description: &'a str,
    pub amount: Decimal,
    pub tx_type: TxType,
    pub history: &'a [Transaction],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: Category,
    pub confidence: f64,
}

pub trait Categorizer {
    fn suggest(&self, req: &CategorizationRequest<'_>) -> Result<Option<Suggestion>>;
}

/// Drops suggestions whose category belongs to the other transaction type.
fn fits(req: &CategorizationRequest<'_>, s: Suggestion, source: &str) -> Option<Suggestion> {
    if s.category.tx_type() != req.tx_type {
        tracing::warn!(
            source,
            category = %s.category,
            tx_type = %req.tx_type,
            "discarding suggestion for the wrong transaction type"
        );
        return None;
    }
    Some(s)
}

pub struct Rule {
    pub id: i64,
    pub pattern: Regex,
    pub category: Option<Category>,
    pub rewrite: Option<String>,
}

/// Regex rules from the `rules` table, newest first.
pub struct RuleCategorizer {
    rules: Vec<Rule>,
}

impl RuleCategorizer {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut stmt = conn
            .prepare("SELECT id, pattern, category, description_rewrite FROM rules ORDER BY id DESC")?;
        let mut cur = stmt.query([])?;
        let mut rules = Vec::new();
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            let pat: String = r.get(1)?;
            let cat: Option<String> = r.get(2)?;
            let rewrite: Option<String> = r.get(3)?;
            let pattern = match Regex::new(&pat) {
                Ok(re) => re,
                Err(err) => {
                    tracing::warn!(id, pattern = %pat, %err, "skipping rule with invalid pattern");
                    continue;
                }
            };
            let category = cat
                .map(|c| c.parse::<Category>())
                .transpose()
                .with_context(|| format!("Rule {} has an invalid category", id))?;
            rules.push(Rule {
                id,
                pattern,
                category,
                rewrite,
            });
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First matching rule's category and description rewrite.
    pub fn apply(&self, description: &str) -> (Option<Category>, Option<String>) {
        self.rules
            .iter()
            .find(|r| r.pattern.is_match(description))
            .map(|r| (r.category, r.rewrite.clone()))
            .unwrap_or((None, None))
    }
}

impl Categorizer for RuleCategorizer {
    fn suggest(&self, req: &CategorizationRequest<'_>) -> Result<Option<Suggestion>> {
        // a matching rule for the other type does not hide older rules of this type
        Ok(self
            .rules
            .iter()
            .filter(|r| r.pattern.is_match(req.description))
            .filter_map(|r| r.category)
            .find_map(|category| {
                let s = Suggestion {
                    category,
                    confidence: 1.0,
                };
                fits(req, s, "rules")
            }))
    }
}

pub fn add_rule(
    conn: &Connection,
    pattern: &str,
    category: Option<Category>,
    rewrite: Option<&str>,
) -> Result<i64> {
    Regex::new(pattern).map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pattern, err))?;
    conn.execute(
        "INSERT INTO rules(pattern, category, description_rewrite) VALUES (?1,?2,?3)",
        params![pattern, category.map(|c| c.as_str()), rewrite],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn remove_rule(conn: &Connection, id: i64) -> Result<()> {
    let changed = conn.execute("DELETE FROM rules WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(anyhow!("Rule {} not found", id));
    }
    Ok(())
}

/// Most frequent category among past transactions with the same normalized description.
pub struct HistoryCategorizer;

impl Categorizer for HistoryCategorizer {
    fn suggest(&self, req: &CategorizationRequest<'_>) -> Result<Option<Suggestion>> {
        let key = normalize_description(req.description);
        if key.is_empty() {
            return Ok(None);
        }
        let mut counts: Vec<(Category, usize)> = Vec::new();
        for t in req
            .history
            .iter()
            .filter(|t| t.tx_type == req.tx_type && normalize_description(&t.description) == key)
        {
            match counts.iter_mut().find(|(c, _)| *c == t.category) {
                Some((_, n)) => *n += 1,
                None => counts.push((t.category, 1)),
            }
        }
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        let mut best: Option<(Category, usize)> = None;
        for (c, n) in counts {
            if best.is_none_or(|(_, b)| n > b) {
                best = Some((c, n));
            }
        }
        Ok(best.map(|(category, n)| Suggestion {
            category,
            confidence: n as f64 / total as f64,
        }))
    }
}

#[derive(Serialize)]
struct RemoteHistoryEntry<'a> {
    description: &'a str,
    amount: Decimal,
    category: Category,
}

#[derive(Serialize)]
struct RemoteRequest<'a> {
    description: &'a str,
    amount: Decimal,
    #[serde(rename = "type")]
    tx_type: TxType,
    history: Vec<RemoteHistoryEntry<'a>>,
}

#[derive(Deserialize)]
struct RemoteReply {
    category: String,
    confidence: f64,
}

/// Asks an HTTP assistant endpoint. It receives `{description, amount, type, history}`
/// and answers `{category, confidence}`.
pub struct RemoteCategorizer {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl RemoteCategorizer {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: http_client()?,
        })
    }
}

impl Categorizer for RemoteCategorizer {
    fn suggest(&self, req: &CategorizationRequest<'_>) -> Result<Option<Suggestion>> {
        let history = req
            .history
            .iter()
            .rev()
            .take(REMOTE_HISTORY_LIMIT)
            .map(|t| RemoteHistoryEntry {
                description: &t.description,
                amount: t.amount,
                category: t.category,
            })
            .collect();
        let body = RemoteRequest {
            description: req.description,
            amount: req.amount,
            tx_type: req.tx_type,
            history,
        };
        let reply: RemoteReply = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .with_context(|| format!("Categorization request to {} failed", self.endpoint))?
            .error_for_status()?
            .json()
            .context("Categorization reply was not valid JSON")?;
        let category = match reply.category.parse::<Category>() {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(%err, "assistant returned an unknown category");
                return Ok(None);
            }
        };
        let s = Suggestion {
            category,
            confidence: reply.confidence.clamp(0.0, 1.0),
        };
        Ok(fits(req, s, "remote"))
    }
}

/// Tries each categorizer in order and returns the first suggestion.
pub struct ChainCategorizer {
    inner: Vec<Box<dyn Categorizer>>,
}

impl ChainCategorizer {
    pub fn new(inner: Vec<Box<dyn Categorizer>>) -> Self {
        Self { inner }
    }

    /// Rules, then history, then the remote endpoint when one is configured.
    pub fn standard(conn: &Connection, endpoint: Option<&str>) -> Result<Self> {
        let mut inner: Vec<Box<dyn Categorizer>> = vec![
            Box::new(RuleCategorizer::load(conn)?),
            Box::new(HistoryCategorizer),
        ];
        if let Some(url) = endpoint {
            inner.push(Box::new(RemoteCategorizer::new(url)?));
        }
        Ok(Self::new(inner))
    }
}

impl Categorizer for ChainCategorizer {
    fn suggest(&self, req: &CategorizationRequest<'_>) -> Result<Option<Suggestion>> {
        for c in &self.inner {
            if let Some(s) = c.suggest(req)? {
                return Ok(Some(s));
            }
        }
        Ok(None)
    }
}
