use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use bigdecimal::BigDecimal;
use serde::Serialize;

use super::{
    flash::{self, Flash},
    AppState,
};
use crate::{
    error::{AppError, AppResult},
    form::{GoalForm, GoalInput},
    models::BudgetGoal,
    month::MonthKey,
    store::{goals, transactions},
};

const LIST: &str = "/budget-goals";

#[derive(Serialize)]
struct GoalView {
    id: i64,
    category: Option<String>,
    amount: BigDecimal,
    spent: BigDecimal,
    over: bool,
}

#[axum::debug_handler]
pub async fn list(State(s): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    let (jar, flashes) = flash::take(jar);
    let month = MonthKey::current();

    let mut views = Vec::new();
    for goal in goals::list_for_month(&s.p, month).await? {
        let spent = match &goal.category {
            Some(category) => transactions::sum_category_expenses(&s.p, category, month).await?,
            None => transactions::sum_expenses(&s.p, month).await?,
        };
        views.push(GoalView {
            id: goal.id,
            over: spent > goal.amount,
            category: goal.category,
            amount: goal.amount,
            spent,
        });
    }

    #[derive(Serialize)]
    struct Ctx {
        flashes: Vec<Flash>,
        goals: Vec<GoalView>,
        current_month: String,
        formatted_month: String,
    }

    let html = s.t.render(
        "budget_goals.hbs",
        &Ctx {
            flashes,
            goals: views,
            current_month: month.key(),
            formatted_month: month.display(),
        },
    )?;
    Ok((jar, html).into_response())
}

/// Creates the goal of `(category, month)` or replaces its amount.
#[axum::debug_handler]
pub async fn save(
    State(s): State<AppState>,
    jar: CookieJar,
    Form(form): Form<GoalForm>,
) -> AppResult<Response> {
    let input = match GoalInput::try_from(form) {
        Ok(input) => input,
        Err(err) => {
            log::warn!("rejected budget goal: {}", err);
            return Ok(flash::redirect(jar, LIST, vec![Flash::error(err.message())]));
        }
    };

    let mut tx = s.p.begin().await?;
    let goal = goals::upsert(&mut *tx, &input).await?;
    tx.commit().await?;
    log::info!(
        "saved goal {} for {} ({}): {}",
        goal.id,
        goal.month,
        goal.category.as_deref().unwrap_or("overall"),
        goal.amount
    );

    Ok(flash::redirect(jar, LIST, vec![Flash::success("Budget goal saved!")]))
}

#[derive(Serialize)]
struct EditCtx {
    flashes: Vec<Flash>,
    goal: BudgetGoal,
    formatted_month: String,
}

pub async fn edit_form(
    State(s): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let goal = goals::get(&s.p, id).await?.ok_or(AppError::NotFound)?;
    let (jar, flashes) = flash::take(jar);

    let html = s.t.render(
        "edit_goal.hbs",
        &EditCtx {
            flashes,
            formatted_month: goal.month.display(),
            goal,
        },
    )?;
    Ok((jar, html).into_response())
}

pub async fn edit(
    State(s): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<GoalForm>,
) -> AppResult<Response> {
    let back = format!("{LIST}/edit/{id}");
    let mut tx = s.p.begin().await?;
    if goals::get(&mut *tx, id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let input = match GoalInput::try_from(form) {
        Ok(input) => input,
        Err(err) => {
            log::warn!("rejected edit of goal {}: {}", id, err);
            return Ok(flash::redirect(jar, &back, vec![Flash::error(err.message())]));
        }
    };

    match goals::update(&mut *tx, id, &input).await {
        Ok(_) => {}
        Err(AppError::Validation(err)) => {
            log::warn!("rejected edit of goal {}: {}", id, err);
            return Ok(flash::redirect(jar, &back, vec![Flash::error(err.message())]));
        }
        Err(err) => return Err(err),
    }
    tx.commit().await?;
    log::info!("updated goal {}", id);

    Ok(flash::redirect(jar, LIST, vec![Flash::success("Budget goal updated!")]))
}

pub async fn delete(
    State(s): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    if !goals::delete(&s.p, id).await? {
        return Err(AppError::NotFound);
    }
    log::info!("deleted goal {}", id);
    Ok(flash::redirect(jar, LIST, vec![Flash::danger("Budget goal deleted!")]))
}
