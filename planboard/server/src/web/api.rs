use std::sync::Arc;

use axum::{
    Json, Router,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::board::{self, BoardState, OrderAssignmentError};
use crate::project::{self, ProjectServiceError, ProjectState};

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine readable error code
    pub error: String,
    /// Human readable description
    pub message: String,
}

/// Error returned by JSON API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// Internal failure. The detail is logged, not returned.
    #[error("{0}")]
    Transaction(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Transaction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Transaction(_) => "TRANSACTION_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<OrderAssignmentError> for ApiError {
    fn from(err: OrderAssignmentError) -> Self {
        match err {
            OrderAssignmentError::Validation(message) => ApiError::Validation(message),
            OrderAssignmentError::ProjectNotFound(_) | OrderAssignmentError::ColumnNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            OrderAssignmentError::OrderConflict(_) | OrderAssignmentError::Database(_) => {
                tracing::error!("Order assignment failed: {}", err);
                ApiError::Transaction("Transaction failed".to_string())
            }
        }
    }
}

impl From<ProjectServiceError> for ApiError {
    fn from(err: ProjectServiceError) -> Self {
        match err {
            ProjectServiceError::Validation(message) => ApiError::Validation(message),
            ProjectServiceError::DuplicateTitle(_) => ApiError::Conflict(err.to_string()),
            ProjectServiceError::ProjectNotFound(_) | ProjectServiceError::NoProjectsForOwner(_) => {
                ApiError::NotFound(err.to_string())
            }
            ProjectServiceError::Database(_) => {
                tracing::error!("Project operation failed: {}", err);
                ApiError::Transaction("Transaction failed".to_string())
            }
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        project::api::v1::save_project_handler,
        project::api::v1::get_user_projects_handler,
        project::api::v1::get_project_handler,
        project::api::v1::get_board_handler,
        board::api::v1::add_column_handler,
        board::api::v1::add_card_handler,
    ),
    components(schemas(ErrorResponse)),
    tags(
        (name = "Projects", description = "Projects and their boards"),
        (name = "Board", description = "Ordered creation of columns and cards")
    )
)]
pub struct ApiDoc;

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(project_state: Arc<ProjectState>, board_state: Arc<BoardState>) -> Router {
    let api_routes = project::api::v1::create_api_router(project_state)
        .merge(board::api::v1::create_api_router(board_state));
    Router::new().nest("/api/v1", api_routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn can_map_validation_error_to_bad_request() {
        let response = ApiError::Validation("title is required".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "VALIDATION_ERROR", "message": "title is required"})
        );
    }

    #[test]
    fn can_map_service_errors_to_status_codes() {
        let id = Uuid::nil();
        let cases = [
            (ApiError::from(OrderAssignmentError::ProjectNotFound(id)), StatusCode::NOT_FOUND),
            (ApiError::from(OrderAssignmentError::ColumnNotFound(id)), StatusCode::NOT_FOUND),
            (
                ApiError::from(OrderAssignmentError::OrderConflict(3)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(ProjectServiceError::DuplicateTitle("Launch".to_string())),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(ProjectServiceError::NoProjectsForOwner("a@b.c".to_string())),
                StatusCode::NOT_FOUND,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status(), status, "{error:?}");
        }
    }

    #[tokio::test]
    async fn cannot_leak_database_details() {
        let error = ApiError::from(OrderAssignmentError::Database(sea_orm::DbErr::Custom(
            "connection reset".to_string(),
        )));
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "TRANSACTION_ERROR", "message": "Transaction failed"})
        );
    }
}
