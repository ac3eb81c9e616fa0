use crate::entities::*;
use chrono::{DateTime, Utc};
use sea_orm::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

pub mod api {
    pub mod v1;
}

/// Heading color given to columns created without one.
pub const DEFAULT_HEADING_COLOR: &str = "#e2e8f0";
/// Attempts made before an order conflict is reported.
pub const DEFAULT_RETRY_LIMIT: u32 = 3;

const COLUMN_KEY_SUFFIX_LEN: usize = 5;

/// A board column as stored, without its cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: Uuid,
    pub title: String,
    /// External key, `col-<millis>-<suffix>`.
    pub column_id: String,
    pub heading_color: String,
    pub project: Uuid,
    pub order: i32,
}

impl From<board_column::Model> for Column {
    fn from(model: board_column::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            column_id: model.column_key,
            heading_color: model.heading_color,
            project: model.project_id,
            order: model.sort_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub column: Uuid,
    pub assigned_to: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<card::Model> for Card {
    fn from(model: card::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            column: model.column_id,
            assigned_to: model.assigned_to,
            order: model.sort_order,
            created_at: model.created_at,
        }
    }
}

/// A column populated with its cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ColumnWithCards {
    pub column: Column,
    pub cards: Vec<Card>,
}

/// A column with its cards listed inline, as returned by project reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PopulatedColumn {
    #[serde(flatten)]
    pub column: Column,
    pub cards: Vec<Card>,
}

/// A card together with the column that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CardWithColumn {
    pub card: Card,
    pub column: Column,
}

/// Request to append a column to a project.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewColumn {
    pub title: Option<String>,
    pub project_id: Option<Uuid>,
    pub heading_color: Option<String>,
}

/// Request to append a card to a column.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub title: Option<String>,
    pub column_id: Option<Uuid>,
}

#[derive(Debug, thiserror::Error)]
pub enum OrderAssignmentError {
    #[error("{0}")]
    Validation(String),
    #[error("Project {0} not found")]
    ProjectNotFound(Uuid),
    #[error("Column {0} not found")]
    ColumnNotFound(Uuid),
    /// Every attempt collided with a concurrent insert.
    #[error("Order conflict persisted after {0} attempts")]
    OrderConflict(u32),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Shared state of the column and card routes.
#[derive(Clone)]
pub struct BoardState {
    pub db: Arc<DatabaseConnection>,
    pub retry_limit: u32,
}

/// Appends columns to projects and cards to columns, giving each new item the
/// next `order` in its parent.
///
/// The read of the current maximum and the insert run in one transaction. The
/// `(parent, sort_order)` unique indexes reject a concurrent writer that read
/// the same maximum; that attempt is rolled back and the whole sequence runs
/// again in a fresh transaction, up to `retry_limit` times.
pub struct OrderAssignmentService<'a> {
    db: &'a DatabaseConnection,
    retry_limit: u32,
}

impl<'a> OrderAssignmentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            retry_limit: DEFAULT_RETRY_LIMIT,
        }
    }

    /// Sets the number of attempts. Zero is treated as one.
    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit.max(1);
        self
    }

    /// Creates a column at the end of the project's column list.
    #[tracing::instrument(skip(self))]
    pub async fn add_column(
        &self,
        new_column: NewColumn,
    ) -> Result<ColumnWithCards, OrderAssignmentError> {
        let (title, project_id) = match (non_blank(new_column.title), new_column.project_id) {
            (Some(title), Some(project_id)) => (title, project_id),
            _ => {
                return Err(OrderAssignmentError::Validation(
                    "Title and projectId are required".to_string(),
                ));
            }
        };
        let heading_color = non_blank(new_column.heading_color)
            .unwrap_or_else(|| DEFAULT_HEADING_COLOR.to_string());

        let title = title.as_str();
        let heading_color = heading_color.as_str();
        let column = self
            .with_retry(move || self.try_add_column(title, project_id, heading_color))
            .await?;

        tracing::info!(
            "Added column {} to project {} at order {}",
            column.column_id,
            project_id,
            column.order
        );
        Ok(ColumnWithCards {
            column,
            cards: Vec::new(),
        })
    }

    /// Creates a card at the end of the column's card list.
    #[tracing::instrument(skip(self))]
    pub async fn add_card(&self, new_card: NewCard) -> Result<CardWithColumn, OrderAssignmentError> {
        let (title, column_id) = match (non_blank(new_card.title), new_card.column_id) {
            (Some(title), Some(column_id)) => (title, column_id),
            _ => {
                return Err(OrderAssignmentError::Validation(
                    "Title and columnId are required".to_string(),
                ));
            }
        };

        let title = title.as_str();
        let created = self
            .with_retry(move || self.try_add_card(title, column_id))
            .await?;

        tracing::info!(
            "Added card {} to column {} at order {}",
            created.card.id,
            column_id,
            created.card.order
        );
        Ok(created)
    }

    async fn try_add_column(
        &self,
        title: &str,
        project_id: Uuid,
        heading_color: &str,
    ) -> Result<Column, OrderAssignmentError> {
        let txn = self.db.begin().await?;

        let project = project::Entity::find_by_id(project_id)
            .one(&txn)
            .await?
            .ok_or(OrderAssignmentError::ProjectNotFound(project_id))?;

        let last_column = board_column::Entity::find()
            .filter(board_column::Column::ProjectId.eq(project.id))
            .order_by_desc(board_column::Column::SortOrder)
            .one(&txn)
            .await?;
        let new_order = last_column.map_or(0, |column| column.sort_order + 1);

        let created = board_column::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            title: ActiveValue::Set(title.to_string()),
            column_key: ActiveValue::Set(generate_column_key()),
            heading_color: ActiveValue::Set(heading_color.to_string()),
            project_id: ActiveValue::Set(project.id),
            sort_order: ActiveValue::Set(new_order),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(Column::from(created))
    }

    async fn try_add_card(
        &self,
        title: &str,
        column_id: Uuid,
    ) -> Result<CardWithColumn, OrderAssignmentError> {
        let txn = self.db.begin().await?;

        let column = board_column::Entity::find_by_id(column_id)
            .one(&txn)
            .await?
            .ok_or(OrderAssignmentError::ColumnNotFound(column_id))?;

        let last_card = card::Entity::find()
            .filter(card::Column::ColumnId.eq(column.id))
            .order_by_desc(card::Column::SortOrder)
            .one(&txn)
            .await?;
        let new_order = last_card.map_or(0, |card| card.sort_order + 1);

        let created = card::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            title: ActiveValue::Set(title.to_string()),
            description: ActiveValue::Set(String::new()),
            column_id: ActiveValue::Set(column.id),
            assigned_to: ActiveValue::Set(None),
            sort_order: ActiveValue::Set(new_order),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(CardWithColumn {
            card: Card::from(created),
            column: Column::from(column),
        })
    }

    /// Runs `attempt` until it succeeds, fails with something other than a
    /// unique violation, or the retry limit is used up.
    async fn with_retry<T, F, Fut>(&self, mut attempt: F) -> Result<T, OrderAssignmentError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, OrderAssignmentError>>,
    {
        for attempt_number in 1..=self.retry_limit {
            match attempt().await {
                Err(OrderAssignmentError::Database(err)) if is_unique_violation(&err) => {
                    tracing::warn!(
                        "Order assignment attempt {}/{} conflicted: {}",
                        attempt_number,
                        self.retry_limit,
                        err
                    );
                }
                result => return result,
            }
        }
        Err(OrderAssignmentError::OrderConflict(self.retry_limit))
    }
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Generates an external column key such as `col-1718000000000-k3x9a`.
pub fn generate_column_key() -> String {
    format!(
        "col-{}-{}",
        Utc::now().timestamp_millis(),
        base36_suffix(Uuid::new_v4().as_u128())
    )
}

fn base36_suffix(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    (0..COLUMN_KEY_SUFFIX_LEN)
        .map(|_| {
            let digit = DIGITS[(value % 36) as usize] as char;
            value /= 36;
            digit
        })
        .collect()
}
