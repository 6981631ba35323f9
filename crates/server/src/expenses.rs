//! Expenses API endpoints.

use api_types::expense::{
    ExpenseListQuery, ExpenseListResponse, ExpenseNew, ExpenseUpdate, ExpenseView, Pagination,
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::Utc;
use engine::Expense;

use crate::{CorrelationId, ServerError, server::ServerState, validation};

fn view(expense: &Expense) -> ExpenseView {
    let record = expense.to_record();
    ExpenseView {
        id: record.id,
        description: record.description,
        amount: record.amount,
        currency: record.currency,
        category: record.category,
        expense_date: record.expense_date,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(correlation_id): Extension<CorrelationId>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let Json(payload) = payload?;
    let cmd = validation::expense_new(payload, Utc::now())?;
    let expense = state.engine.create_expense(cmd).await?;

    tracing::info!(%correlation_id, expense_id = %expense.id(), "expense created");
    Ok((StatusCode::CREATED, Json(view(&expense))))
}

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ExpenseListQuery>, QueryRejection>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let Query(query) = query?;
    let (filter, pagination) = validation::expense_list(query)?;
    let page = state.engine.list_expenses(&filter, pagination).await?;

    Ok(Json(ExpenseListResponse {
        data: page.data.iter().map(view).collect(),
        pagination: Pagination {
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages: page.total_pages,
        },
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(&id).await?;
    Ok(Json(view(&expense)))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(correlation_id): Extension<CorrelationId>,
    Path(id): Path<String>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let Json(payload) = payload?;
    let cmd = validation::expense_update(id, payload)?;
    let expense = state.engine.update_expense(cmd).await?;

    tracing::info!(%correlation_id, expense_id = %expense.id(), "expense updated");
    Ok(Json(view(&expense)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Extension(correlation_id): Extension<CorrelationId>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(&id).await?;

    tracing::info!(%correlation_id, expense_id = %id, "expense deleted");
    Ok(StatusCode::NO_CONTENT)
}
