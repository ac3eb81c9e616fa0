use crate::board::{Card, Column, PopulatedColumn, is_unique_violation};
use crate::entities::project::ProjectStatus;
use crate::entities::*;
use chrono::{DateTime, Utc};
use planboard_core::{Board, PersistedCard, PersistedColumn};
use sea_orm::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

pub mod api {
    pub mod v1;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TeamMember {
    pub email: String,
}

impl From<team_member::Model> for TeamMember {
    fn from(model: team_member::Model) -> Self {
        Self { email: model.email }
    }
}

/// A project with its team and the ids of its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub owner: String,
    pub team_members: Vec<TeamMember>,
    pub columns: Vec<Uuid>,
    pub status: ProjectStatus,
}

impl Project {
    fn from_parts(
        model: project::Model,
        members: Vec<team_member::Model>,
        columns: Vec<board_column::Model>,
    ) -> Self {
        let mut columns = columns;
        columns.sort_by_key(|column| column.sort_order);
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            created_at: model.created_at,
            deadline: model.deadline,
            owner: model.owner,
            team_members: members.into_iter().map(TeamMember::from).collect(),
            columns: columns.into_iter().map(|column| column.id).collect(),
            status: model.status,
        }
    }
}

/// A project with every column populated with its cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub owner: String,
    pub team_members: Vec<TeamMember>,
    pub columns: Vec<PopulatedColumn>,
    pub status: ProjectStatus,
}

/// Request to create a project.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub owner: Option<String>,
    #[serde(default)]
    pub team_members: Vec<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProjectServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("A project titled '{0}' already exists")]
    DuplicateTitle(String),
    #[error("Project {0} not found")]
    ProjectNotFound(Uuid),
    #[error("No projects found for {0}")]
    NoProjectsForOwner(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

struct ValidProject {
    title: String,
    description: String,
    deadline: Option<DateTime<Utc>>,
    owner: String,
    team_members: Vec<String>,
    status: ProjectStatus,
}

impl TryFrom<NewProject> for ValidProject {
    type Error = ProjectServiceError;

    fn try_from(new_project: NewProject) -> Result<Self, Self::Error> {
        let required = |value: Option<String>, field: &str| {
            value
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ProjectServiceError::Validation(format!("{field} is required")))
        };

        let title = required(new_project.title, "title")?;
        let description = required(new_project.description, "description")?;
        let owner = required(new_project.owner, "owner")?;

        if new_project.team_members.is_empty() {
            return Err(ProjectServiceError::Validation(
                "at least one team member is required".to_string(),
            ));
        }
        let mut team_members: Vec<String> = Vec::with_capacity(new_project.team_members.len());
        for email in new_project.team_members {
            let email = email.trim().to_lowercase();
            if email.is_empty() {
                return Err(ProjectServiceError::Validation(
                    "team member email must not be blank".to_string(),
                ));
            }
            if !team_members.contains(&email) {
                team_members.push(email);
            }
        }

        Ok(Self {
            title,
            description,
            deadline: new_project.deadline,
            owner,
            team_members,
            status: new_project.status.unwrap_or_default(),
        })
    }
}

/// Shared state of the project routes.
#[derive(Clone)]
pub struct ProjectState {
    pub db: Arc<DatabaseConnection>,
}

pub struct ProjectService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProjectService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a project and its team in one transaction.
    #[tracing::instrument(skip(self))]
    pub async fn save_project(&self, new_project: NewProject) -> Result<Project, ProjectServiceError> {
        let valid = ValidProject::try_from(new_project)?;

        let txn = self.db.begin().await?;
        let created = project::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            title: ActiveValue::Set(valid.title.clone()),
            description: ActiveValue::Set(valid.description),
            created_at: ActiveValue::Set(Utc::now()),
            deadline: ActiveValue::Set(valid.deadline),
            owner: ActiveValue::Set(valid.owner),
            status: ActiveValue::Set(valid.status),
        }
        .insert(&txn)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                ProjectServiceError::DuplicateTitle(valid.title.clone())
            } else {
                ProjectServiceError::Database(err)
            }
        })?;

        let members: Vec<team_member::Model> = valid
            .team_members
            .into_iter()
            .map(|email| team_member::Model {
                project_id: created.id,
                email,
            })
            .collect();
        team_member::Entity::insert_many(members.iter().map(|member| team_member::ActiveModel {
            project_id: ActiveValue::Set(member.project_id),
            email: ActiveValue::Set(member.email.clone()),
        }))
        .exec(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!("Created project {} for {}", created.id, created.owner);
        Ok(Project::from_parts(created, members, Vec::new()))
    }

    /// Lists the projects owned by `owner`.
    #[tracing::instrument(skip(self))]
    pub async fn get_user_projects(&self, owner: &str) -> Result<Vec<Project>, ProjectServiceError> {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(ProjectServiceError::Validation(
                "owner is required".to_string(),
            ));
        }

        let projects = project::Entity::find()
            .filter(project::Column::Owner.eq(owner))
            .order_by_asc(project::Column::CreatedAt)
            .all(self.db)
            .await?;
        if projects.is_empty() {
            return Err(ProjectServiceError::NoProjectsForOwner(owner.to_string()));
        }

        let members = projects.load_many(team_member::Entity, self.db).await?;
        let columns = projects.load_many(board_column::Entity, self.db).await?;

        Ok(projects
            .into_iter()
            .zip(members)
            .zip(columns)
            .map(|((project, members), columns)| Project::from_parts(project, members, columns))
            .collect())
    }

    /// Reads a project with its team and every column populated with its cards.
    #[tracing::instrument(skip(self))]
    pub async fn get_project(&self, project_id: Uuid) -> Result<ProjectDetail, ProjectServiceError> {
        let model = project::Entity::find_by_id(project_id)
            .one(self.db)
            .await?
            .ok_or(ProjectServiceError::ProjectNotFound(project_id))?;

        let members = model.find_related(team_member::Entity).all(self.db).await?;
        let columns = board_column::Entity::find()
            .filter(board_column::Column::ProjectId.eq(model.id))
            .find_with_related(card::Entity)
            .all(self.db)
            .await?;

        Ok(ProjectDetail {
            id: model.id,
            title: model.title,
            description: model.description,
            created_at: model.created_at,
            deadline: model.deadline,
            owner: model.owner,
            team_members: members.into_iter().map(TeamMember::from).collect(),
            columns: columns
                .into_iter()
                .map(|(column, cards)| PopulatedColumn {
                    column: Column::from(column),
                    cards: cards.into_iter().map(Card::from).collect(),
                })
                .collect(),
            status: model.status,
        })
    }

    /// Reads a project as a board in display order.
    #[tracing::instrument(skip(self))]
    pub async fn get_board(&self, project_id: Uuid) -> Result<Board, ProjectServiceError> {
        let detail = self.get_project(project_id).await?;
        Ok(board_from_columns(detail.columns))
    }
}

/// Converts stored columns into a board sorted by each item's `order`.
pub fn board_from_columns(columns: Vec<PopulatedColumn>) -> Board {
    Board::from_columns(columns.into_iter().map(|populated| PersistedColumn {
        key: populated.column.column_id,
        title: populated.column.title,
        heading_color: populated.column.heading_color,
        order: i64::from(populated.column.order),
        cards: populated
            .cards
            .into_iter()
            .map(|card| PersistedCard {
                id: card.id.to_string(),
                title: card.title,
                order: i64::from(card.order),
            })
            .collect(),
    }))
}
