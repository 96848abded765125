use bigdecimal::BigDecimal;
use sqlx::SqliteExecutor;

use crate::{
    error::{AppError, AppResult},
    form::TransactionInput,
    models::{Transaction, TransactionKind, TransactionRow},
    month::MonthKey,
};

use super::sum_amounts;

pub async fn list_all<'e, E: SqliteExecutor<'e>>(ex: E) -> AppResult<Vec<Transaction>> {
    let rows = sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT id, date, kind, category, amount, description
        FROM transactions
        ORDER BY date DESC, id DESC
        "#,
    )
    .fetch_all(ex)
    .await?;

    rows.into_iter()
        .map(|r| Transaction::try_from(r).map_err(AppError::from))
        .collect()
}

pub async fn get<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> AppResult<Option<Transaction>> {
    let row = sqlx::query_as::<_, TransactionRow>(
        "SELECT id, date, kind, category, amount, description FROM transactions WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;

    Ok(row.map(Transaction::try_from).transpose()?)
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(
    ex: E,
    input: &TransactionInput,
) -> AppResult<Transaction> {
    let row = sqlx::query_as::<_, TransactionRow>(
        r#"
        INSERT INTO transactions (date, kind, category, amount, description)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, date, kind, category, amount, description
        "#,
    )
    .bind(input.date)
    .bind(input.kind.as_str())
    .bind(&input.category)
    .bind(input.amount.to_string())
    .bind(&input.description)
    .fetch_one(ex)
    .await?;

    Ok(Transaction::try_from(row)?)
}

/// Returns `false` when no transaction has this id.
pub async fn update<'e, E: SqliteExecutor<'e>>(
    ex: E,
    id: i64,
    input: &TransactionInput,
) -> AppResult<bool> {
    let res = sqlx::query(
        r#"
        UPDATE transactions
        SET date = ?, kind = ?, category = ?, amount = ?, description = ?
        WHERE id = ?
        "#,
    )
    .bind(input.date)
    .bind(input.kind.as_str())
    .bind(&input.category)
    .bind(input.amount.to_string())
    .bind(&input.description)
    .bind(id)
    .execute(ex)
    .await?;

    Ok(res.rows_affected() > 0)
}

/// Returns `false` when no transaction has this id.
pub async fn delete<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> AppResult<bool> {
    let res = sqlx::query("DELETE FROM transactions WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn sum_by_kind<'e, E: SqliteExecutor<'e>>(
    ex: E,
    kind: TransactionKind,
) -> AppResult<BigDecimal> {
    let amounts: Vec<String> =
        sqlx::query_scalar("SELECT amount FROM transactions WHERE kind = ?")
            .bind(kind.as_str())
            .fetch_all(ex)
            .await?;
    sum_amounts(amounts)
}

/// Expenses of any category dated within `month`.
pub async fn sum_expenses<'e, E: SqliteExecutor<'e>>(
    ex: E,
    month: MonthKey,
) -> AppResult<BigDecimal> {
    let amounts: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT amount FROM transactions
        WHERE kind = 'expense' AND strftime('%Y-%m', date) = ?
        "#,
    )
    .bind(month.key())
    .fetch_all(ex)
    .await?;
    sum_amounts(amounts)
}

pub async fn sum_category_expenses<'e, E: SqliteExecutor<'e>>(
    ex: E,
    category: &str,
    month: MonthKey,
) -> AppResult<BigDecimal> {
    let amounts: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT amount FROM transactions
        WHERE kind = 'expense' AND category = ? AND strftime('%Y-%m', date) = ?
        "#,
    )
    .bind(category)
    .bind(month.key())
    .fetch_all(ex)
    .await?;
    sum_amounts(amounts)
}
