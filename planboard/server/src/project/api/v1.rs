use crate::project::{NewProject, Project, ProjectDetail, ProjectService, ProjectState};
use crate::web::api::{ApiError, ErrorResponse};
use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Json,
    routing::get,
};
use planboard_core::{Board, BoardColumn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// API response for listing the projects of one owner.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectsResponse {
    projects: Vec<Project>,
    count: usize,
}

/// Query parameters for listing projects.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProjectsQuery {
    /// Email of the project owner
    #[serde(default)]
    owner: Option<String>,
}

/// A project's columns and cards in display order.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    project_id: Uuid,
    /// Columns with `key`, `title`, `headingColor` and their `cards`
    #[schema(value_type = Vec<Object>)]
    columns: Vec<BoardColumn>,
}

impl BoardResponse {
    fn new(project_id: Uuid, board: &Board) -> Self {
        Self {
            project_id,
            columns: board.columns().to_vec(),
        }
    }
}

/// Handler for POST /api/v1/projects - Creates a project with its team.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = NewProject,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 409, description = "A project with this title exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Projects"
)]
pub async fn save_project_handler(
    State(state): State<Arc<ProjectState>>,
    payload: Result<Json<NewProject>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let Json(new_project) = payload?;
    let project = ProjectService::new(&state.db)
        .save_project(new_project)
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// Handler for GET /api/v1/projects - Lists the projects of an owner.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    params(
        ("owner" = String, Query, description = "Email of the project owner")
    ),
    responses(
        (status = 200, description = "Projects of the owner", body = ProjectsResponse),
        (status = 400, description = "Owner missing", body = ErrorResponse),
        (status = 404, description = "The owner has no projects", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Projects"
)]
pub async fn get_user_projects_handler(
    State(state): State<Arc<ProjectState>>,
    Query(query): Query<ProjectsQuery>,
) -> Result<Json<ProjectsResponse>, ApiError> {
    let owner = query.owner.unwrap_or_default();
    let projects = ProjectService::new(&state.db)
        .get_user_projects(&owner)
        .await?;
    let count = projects.len();
    Ok(Json(ProjectsResponse { projects, count }))
}

/// Handler for GET /api/v1/projects/{project_id} - Returns a populated project.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}",
    params(
        ("project_id" = Uuid, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Project with columns and cards", body = ProjectDetail),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Projects"
)]
pub async fn get_project_handler(
    State(state): State<Arc<ProjectState>>,
    project_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ProjectDetail>, ApiError> {
    let Path(project_id) = project_id?;
    let project = ProjectService::new(&state.db)
        .get_project(project_id)
        .await?;
    Ok(Json(project))
}

/// Handler for GET /api/v1/projects/{project_id}/board - Returns the board in display order.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/board",
    params(
        ("project_id" = Uuid, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "Columns and cards sorted by order", body = BoardResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Projects"
)]
pub async fn get_board_handler(
    State(state): State<Arc<ProjectState>>,
    project_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<BoardResponse>, ApiError> {
    let Path(project_id) = project_id?;
    let board = ProjectService::new(&state.db).get_board(project_id).await?;
    Ok(Json(BoardResponse::new(project_id, &board)))
}

/// Creates and returns the projects API router.
pub fn create_api_router(state: Arc<ProjectState>) -> Router {
    Router::new()
        .route(
            "/projects",
            get(get_user_projects_handler).post(save_project_handler),
        )
        .route("/projects/{project_id}", get(get_project_handler))
        .route("/projects/{project_id}/board", get(get_board_handler))
        .with_state(state)
}
