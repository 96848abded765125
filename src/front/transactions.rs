use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use bigdecimal::BigDecimal;
use chrono::Utc;
use serde::Serialize;

use super::{
    flash::{self, Flash},
    AppState,
};
use crate::{
    budget,
    error::{AppError, AppResult},
    form::{TransactionForm, TransactionInput},
    models::{Transaction, TransactionKind},
    store::transactions,
};

#[axum::debug_handler]
pub async fn index(State(s): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    let (jar, flashes) = flash::take(jar);

    let list = transactions::list_all(&s.p).await?;
    let income_total = transactions::sum_by_kind(&s.p, TransactionKind::Income).await?;
    let expense_total = transactions::sum_by_kind(&s.p, TransactionKind::Expense).await?;
    let balance = &income_total - &expense_total;

    #[derive(Serialize)]
    struct Ctx {
        flashes: Vec<Flash>,
        transactions: Vec<Transaction>,
        income_total: BigDecimal,
        expense_total: BigDecimal,
        balance: BigDecimal,
        today: String,
    }

    let html = s.t.render(
        "index.hbs",
        &Ctx {
            flashes,
            transactions: list,
            income_total,
            expense_total,
            balance,
            today: Utc::now().date_naive().to_string(),
        },
    )?;
    Ok((jar, html).into_response())
}

#[axum::debug_handler]
pub async fn add(
    State(s): State<AppState>,
    jar: CookieJar,
    Form(form): Form<TransactionForm>,
) -> AppResult<Response> {
    let input = match TransactionInput::try_from(form) {
        Ok(input) => input,
        Err(err) => {
            log::warn!("rejected new transaction: {}", err);
            return Ok(flash::redirect(jar, "/", vec![Flash::error(err.message())]));
        }
    };

    let mut tx = s.p.begin().await?;
    let created = transactions::insert(&mut *tx, &input).await?;
    let notices = budget::check(&mut *tx, &created).await?;
    tx.commit().await?;
    log::info!(
        "added {} {} of {} in '{}'",
        created.kind,
        created.id,
        created.amount,
        created.category
    );

    let mut flashes: Vec<Flash> = notices
        .iter()
        .map(|n| Flash::error(n.message(&s.currency)))
        .collect();
    flashes.push(Flash::success("Transaction added!"));
    Ok(flash::redirect(jar, "/", flashes))
}

#[derive(Serialize)]
struct EditCtx {
    flashes: Vec<Flash>,
    transaction: Transaction,
    is_income: bool,
}

pub async fn edit_form(
    State(s): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let transaction = transactions::get(&s.p, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let (jar, flashes) = flash::take(jar);

    let html = s.t.render(
        "edit.hbs",
        &EditCtx {
            flashes,
            is_income: transaction.kind == TransactionKind::Income,
            transaction,
        },
    )?;
    Ok((jar, html).into_response())
}

pub async fn edit(
    State(s): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<TransactionForm>,
) -> AppResult<Response> {
    let mut tx = s.p.begin().await?;
    if transactions::get(&mut *tx, id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let input = match TransactionInput::try_from(form) {
        Ok(input) => input,
        Err(err) => {
            log::warn!("rejected edit of transaction {}: {}", id, err);
            let back = format!("/edit/{id}");
            return Ok(flash::redirect(jar, &back, vec![Flash::error(err.message())]));
        }
    };

    transactions::update(&mut *tx, id, &input).await?;
    tx.commit().await?;
    log::info!("updated transaction {}", id);
    Ok(flash::redirect(jar, "/", vec![Flash::success("Transaction updated!")]))
}

pub async fn delete(
    State(s): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    if !transactions::delete(&s.p, id).await? {
        return Err(AppError::NotFound);
    }
    log::info!("deleted transaction {}", id);
    Ok(flash::redirect(jar, "/", vec![Flash::danger("Transaction deleted!")]))
}
