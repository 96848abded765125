use std::{fmt, str::FromStr};

use anyhow::{anyhow, Context};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;

use crate::month::MonthKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: String,
    pub amount: BigDecimal,
    pub description: Option<String>,
}

impl Transaction {
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

/// A spending limit for one month. `category == None` is the overall limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetGoal {
    pub id: i64,
    pub category: Option<String>,
    pub month: MonthKey,
    pub amount: BigDecimal,
}

impl BudgetGoal {
    pub fn is_overall(&self) -> bool {
        self.category.is_none()
    }
}

// sqlite has no decimal type; amounts are kept as text and decoded here.

#[derive(sqlx::FromRow)]
pub(crate) struct TransactionRow {
    id: i64,
    date: NaiveDate,
    kind: String,
    category: String,
    amount: String,
    description: Option<String>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = anyhow::Error;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse::<TransactionKind>()
            .map_err(|_| anyhow!("transaction {} has unknown type '{}'", row.id, row.kind))?;
        Ok(Transaction {
            id: row.id,
            date: row.date,
            kind,
            category: row.category,
            amount: parse_amount(&row.amount)
                .with_context(|| format!("transaction {}", row.id))?,
            description: row.description,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct BudgetGoalRow {
    id: i64,
    category: Option<String>,
    month: String,
    amount: String,
}

impl TryFrom<BudgetGoalRow> for BudgetGoal {
    type Error = anyhow::Error;

    fn try_from(row: BudgetGoalRow) -> Result<Self, Self::Error> {
        let month = MonthKey::parse_key(&row.month)
            .ok_or_else(|| anyhow!("budget goal {} has bad month '{}'", row.id, row.month))?;
        Ok(BudgetGoal {
            id: row.id,
            category: row.category,
            month,
            amount: parse_amount(&row.amount)
                .with_context(|| format!("budget goal {}", row.id))?,
        })
    }
}

pub(crate) fn parse_amount(s: &str) -> anyhow::Result<BigDecimal> {
    BigDecimal::from_str(s).with_context(|| format!("stored amount '{s}' is not a decimal"))
}
