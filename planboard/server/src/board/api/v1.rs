use crate::board::{
    BoardState, CardWithColumn, ColumnWithCards, NewCard, NewColumn, OrderAssignmentService,
};
use crate::web::api::{ApiError, ErrorResponse};
use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::post,
};
use std::sync::Arc;

/// Handler for POST /api/v1/columns - Appends a column to a project.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/v1/columns",
    request_body = NewColumn,
    responses(
        (status = 201, description = "Column created with the next order", body = ColumnWithCards),
        (status = 400, description = "Title or projectId missing", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Transaction failed", body = ErrorResponse)
    ),
    tag = "Board"
)]
pub async fn add_column_handler(
    State(state): State<Arc<BoardState>>,
    payload: Result<Json<NewColumn>, JsonRejection>,
) -> Result<(StatusCode, Json<ColumnWithCards>), ApiError> {
    let Json(new_column) = payload?;
    let created = OrderAssignmentService::new(&state.db)
        .with_retry_limit(state.retry_limit)
        .add_column(new_column)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for POST /api/v1/cards - Appends a card to a column.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/v1/cards",
    request_body = NewCard,
    responses(
        (status = 201, description = "Card created with the next order", body = CardWithColumn),
        (status = 400, description = "Title or columnId missing", body = ErrorResponse),
        (status = 404, description = "Column not found", body = ErrorResponse),
        (status = 500, description = "Transaction failed", body = ErrorResponse)
    ),
    tag = "Board"
)]
pub async fn add_card_handler(
    State(state): State<Arc<BoardState>>,
    payload: Result<Json<NewCard>, JsonRejection>,
) -> Result<(StatusCode, Json<CardWithColumn>), ApiError> {
    let Json(new_card) = payload?;
    let created = OrderAssignmentService::new(&state.db)
        .with_retry_limit(state.retry_limit)
        .add_card(new_card)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Creates and returns the columns and cards API router.
pub fn create_api_router(state: Arc<BoardState>) -> Router {
    Router::new()
        .route("/columns", post(add_column_handler))
        .route("/cards", post(add_card_handler))
        .with_state(state)
}
