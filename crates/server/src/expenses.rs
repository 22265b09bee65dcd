//! Expenses API endpoints

use api_types::expense::{ExpenseNew, ExpenseView};
use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use engine::{Expense, ExpenseDraft};

use crate::{ServerError, server::ServerState};

fn view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        description: expense.description,
        amount: expense.amount,
        date: expense.date,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state.engine.list_all().await?;

    Ok(Json(expenses.into_iter().map(view).collect()))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .insert(ExpenseDraft {
            description: payload.description,
            amount: payload.amount,
            date: payload.date,
        })
        .await?;

    Ok(Json(view(expense)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.get(&id).await?;

    Ok(Json(view(expense)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create an expense from the first uploaded file of a multipart form.
///
/// The file must declare an `image/*` content type.
pub async fn upload_receipt(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<ExpenseView>, ServerError> {
    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_none() && field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(ServerError::InvalidInput(format!(
                "File must be an image, got '{content_type}'"
            )));
        }

        let image = field.bytes().await?;
        return expense_from_receipt(&state, image).await.map(Json);
    }

    Err(ServerError::InvalidInput(
        "missing receipt image file".to_string(),
    ))
}

async fn expense_from_receipt(state: &ServerState, image: Bytes) -> Result<ExpenseView, ServerError> {
    let text = state.ocr.recognize(image).await.map_err(|err| {
        tracing::warn!("receipt OCR failed: {err}");
        ServerError::Ocr(err)
    })?;

    let receipt = engine::extract(&text);
    tracing::debug!(
        "receipt extracted: {:?} {:.2}",
        receipt.description,
        receipt.amount
    );

    let expense = state
        .engine
        .insert(receipt.into())
        .await
        .map_err(|err| ServerError::Processing(err.to_string()))?;

    Ok(view(expense))
}
