use sqlx::{SqliteConnection, SqliteExecutor};

use crate::{
    error::{AppError, AppResult, ValidationError},
    form::GoalInput,
    models::{BudgetGoal, BudgetGoalRow},
    month::MonthKey,
};

pub const DUPLICATE_GOAL: &str = "A budget goal for that category and month already exists.";

/// Goals of one month, the overall goal first and then by category.
pub async fn list_for_month<'e, E: SqliteExecutor<'e>>(
    ex: E,
    month: MonthKey,
) -> AppResult<Vec<BudgetGoal>> {
    let rows = sqlx::query_as::<_, BudgetGoalRow>(
        r#"
        SELECT id, category, month, amount
        FROM budget_goals
        WHERE month = ?
        ORDER BY category IS NOT NULL, category, id
        "#,
    )
    .bind(month.key())
    .fetch_all(ex)
    .await?;

    rows.into_iter()
        .map(|r| BudgetGoal::try_from(r).map_err(AppError::from))
        .collect()
}

pub async fn get<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> AppResult<Option<BudgetGoal>> {
    let row = sqlx::query_as::<_, BudgetGoalRow>(
        "SELECT id, category, month, amount FROM budget_goals WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;

    Ok(row.map(BudgetGoal::try_from).transpose()?)
}

/// Looks up the goal for `(category, month)`; `None` category is the overall goal.
pub async fn find<'e, E: SqliteExecutor<'e>>(
    ex: E,
    category: Option<&str>,
    month: MonthKey,
) -> AppResult<Option<BudgetGoal>> {
    // `IS` so that a NULL category matches the overall goal
    let row = sqlx::query_as::<_, BudgetGoalRow>(
        r#"
        SELECT id, category, month, amount
        FROM budget_goals
        WHERE category IS ? AND month = ?
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(category)
    .bind(month.key())
    .fetch_optional(ex)
    .await?;

    Ok(row.map(BudgetGoal::try_from).transpose()?)
}

/// Creates the goal for `(category, month)` or overwrites the amount of the existing one.
pub async fn upsert(conn: &mut SqliteConnection, input: &GoalInput) -> AppResult<BudgetGoal> {
    if let Some(mut goal) = find(&mut *conn, input.category.as_deref(), input.month).await? {
        sqlx::query("UPDATE budget_goals SET amount = ? WHERE id = ?")
            .bind(input.amount.to_string())
            .bind(goal.id)
            .execute(&mut *conn)
            .await?;
        goal.amount = input.amount.clone();
        return Ok(goal);
    }

    let row = sqlx::query_as::<_, BudgetGoalRow>(
        r#"
        INSERT INTO budget_goals (category, month, amount)
        VALUES (?, ?, ?)
        RETURNING id, category, month, amount
        "#,
    )
    .bind(&input.category)
    .bind(input.month.key())
    .bind(input.amount.to_string())
    .fetch_one(&mut *conn)
    .await?;

    Ok(BudgetGoal::try_from(row)?)
}

/// Rewrites every field of goal `id`.
///
/// Fails with `NotFound` for an unknown id, and with a validation error when
/// another goal already owns the new `(category, month)` pair.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    input: &GoalInput,
) -> AppResult<BudgetGoal> {
    if get(&mut *conn, id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    if let Some(other) = find(&mut *conn, input.category.as_deref(), input.month).await? {
        if other.id != id {
            return Err(ValidationError::new(DUPLICATE_GOAL).into());
        }
    }

    sqlx::query("UPDATE budget_goals SET category = ?, month = ?, amount = ? WHERE id = ?")
        .bind(&input.category)
        .bind(input.month.key())
        .bind(input.amount.to_string())
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(BudgetGoal {
        id,
        category: input.category.clone(),
        month: input.month,
        amount: input.amount.clone(),
    })
}

/// Returns `false` when no goal has this id.
pub async fn delete<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> AppResult<bool> {
    let res = sqlx::query("DELETE FROM budget_goals WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(res.rows_affected() > 0)
}
