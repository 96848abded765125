//! Advisory check run after an expense is recorded.

use bigdecimal::BigDecimal;
use sqlx::SqliteConnection;

use crate::{
    error::AppResult,
    models::{Transaction, TransactionKind},
    store::{goals, transactions},
};

#[derive(Debug, Clone, PartialEq)]
pub enum BudgetNotice {
    CategoryExceeded { category: String, limit: BigDecimal },
    OverallExceeded { limit: BigDecimal },
}

impl BudgetNotice {
    /// User facing text, `currency` labels the limit.
    pub fn message(&self, currency: &str) -> String {
        match self {
            BudgetNotice::CategoryExceeded { category, limit } => format!(
                "You exceeded the budget for category \"{category}\" (Limit: {currency} {limit})"
            ),
            BudgetNotice::OverallExceeded { limit } => {
                format!("You exceeded your overall monthly budget (Limit: {currency} {limit})")
            }
        }
    }
}

/// Compares the month of `tx` against its category goal and the overall goal.
///
/// `tx` must already be stored so that it counts towards the sums. Income
/// never yields a notice. Limits are only exceeded when spending is strictly
/// greater.
pub async fn check(conn: &mut SqliteConnection, tx: &Transaction) -> AppResult<Vec<BudgetNotice>> {
    let mut notices = Vec::new();
    if tx.kind != TransactionKind::Expense {
        return Ok(notices);
    }
    let month = tx.month();

    if let Some(goal) = goals::find(&mut *conn, Some(tx.category.as_str()), month).await? {
        let spent = transactions::sum_category_expenses(&mut *conn, &tx.category, month).await?;
        if spent > goal.amount {
            notices.push(BudgetNotice::CategoryExceeded {
                category: tx.category.clone(),
                limit: goal.amount,
            });
        }
    }

    if let Some(goal) = goals::find(&mut *conn, None, month).await? {
        let spent = transactions::sum_expenses(&mut *conn, month).await?;
        if spent > goal.amount {
            notices.push(BudgetNotice::OverallExceeded { limit: goal.amount });
        }
    }

    Ok(notices)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;

    use super::*;
    use crate::{
        form::{GoalInput, TransactionInput},
        month::MonthKey,
        store::testing,
    };

    async fn expense(
        conn: &mut SqliteConnection,
        date: &str,
        category: &str,
        amount: &str,
    ) -> Transaction {
        let input = TransactionInput {
            date: NaiveDate::from_str(date).unwrap(),
            kind: TransactionKind::Expense,
            category: category.into(),
            amount: BigDecimal::from_str(amount).unwrap(),
            description: None,
        };
        transactions::insert(&mut *conn, &input).await.unwrap()
    }

    async fn set_goal(
        conn: &mut SqliteConnection,
        category: Option<&str>,
        month: &str,
        amount: i32,
    ) {
        let input = GoalInput {
            category: category.map(str::to_string),
            month: MonthKey::parse_display(month).unwrap(),
            amount: BigDecimal::from(amount),
        };
        goals::upsert(conn, &input).await.unwrap();
    }

    #[tokio::test]
    async fn overall_goal_exceeded_only_when_strictly_over() {
        let (p, _dir) = testing::pool().await;
        let mut conn = p.acquire().await.unwrap();
        set_goal(&mut conn, None, "8/2025", 100).await;

        let t = expense(&mut conn, "2025-08-02", "food", "60").await;
        assert!(check(&mut conn, &t).await.unwrap().is_empty());

        let t = expense(&mut conn, "2025-08-20", "rent", "40").await;
        assert!(check(&mut conn, &t).await.unwrap().is_empty(), "exactly at limit");

        let t = expense(&mut conn, "2025-08-21", "fun", "10").await;
        assert_eq!(
            check(&mut conn, &t).await.unwrap(),
            vec![BudgetNotice::OverallExceeded {
                limit: BigDecimal::from(100)
            }]
        );
    }

    #[tokio::test]
    async fn single_expense_under_overall_goal() {
        let (p, _dir) = testing::pool().await;
        let mut conn = p.acquire().await.unwrap();
        set_goal(&mut conn, None, "8/2025", 100).await;

        let t = expense(&mut conn, "2025-08-02", "food", "90").await;
        assert!(check(&mut conn, &t).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn category_and_overall_notices_together() {
        let (p, _dir) = testing::pool().await;
        let mut conn = p.acquire().await.unwrap();
        set_goal(&mut conn, Some("food"), "8/2025", 50).await;
        set_goal(&mut conn, None, "8/2025", 100).await;

        expense(&mut conn, "2025-08-01", "rent", "80").await;
        let t = expense(&mut conn, "2025-08-05", "food", "55").await;

        let notices = check(&mut conn, &t).await.unwrap();
        assert_eq!(
            notices,
            vec![
                BudgetNotice::CategoryExceeded {
                    category: "food".into(),
                    limit: BigDecimal::from(50)
                },
                BudgetNotice::OverallExceeded {
                    limit: BigDecimal::from(100)
                },
            ]
        );
        assert_eq!(
            notices[0].message("BND"),
            "You exceeded the budget for category \"food\" (Limit: BND 50)"
        );
    }

    #[tokio::test]
    async fn uses_month_of_transaction_date() {
        let (p, _dir) = testing::pool().await;
        let mut conn = p.acquire().await.unwrap();
        set_goal(&mut conn, None, "7/2025", 10).await;

        expense(&mut conn, "2025-07-31", "food", "5").await;
        // lands in august, july goal does not apply
        let t = expense(&mut conn, "2025-08-01", "food", "500").await;
        assert!(check(&mut conn, &t).await.unwrap().is_empty());

        let t = expense(&mut conn, "2025-07-15", "food", "6").await;
        assert_eq!(check(&mut conn, &t).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn income_is_never_checked() {
        let (p, _dir) = testing::pool().await;
        let mut conn = p.acquire().await.unwrap();
        set_goal(&mut conn, None, "8/2025", 0).await;

        let input = TransactionInput {
            date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            kind: TransactionKind::Income,
            category: "salary".into(),
            amount: BigDecimal::from(1000),
            description: None,
        };
        let t = transactions::insert(&mut *conn, &input).await.unwrap();
        assert!(check(&mut conn, &t).await.unwrap().is_empty());
    }
}
