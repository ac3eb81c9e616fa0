use planboard_server::board::{NewCard, NewColumn, OrderAssignmentService};
use planboard_server::entities::project::ProjectStatus;
use planboard_server::entities::{project, team_member};
use planboard_server::project::{NewProject, ProjectService, ProjectServiceError};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use testcontainers_modules::{postgres, testcontainers};
use uuid::Uuid;

mod common;

pub struct TestContext {
    #[allow(dead_code)] // container is kept to ensure it's not dropped
    pub container: testcontainers::ContainerAsync<postgres::Postgres>,
    pub db: DatabaseConnection,
}

async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let container = common::setup_container().await?;
    let db = common::setup_db(&container).await?;
    Ok(TestContext { db, container })
}

#[tokio::test]
async fn can_save_project_with_normalized_team() {
    let state = setup().await.expect("Failed to setup test context");
    let service = ProjectService::new(&state.db);

    let project = service
        .save_project(NewProject {
            team_members: vec![
                " Alice@Example.com".to_string(),
                "alice@example.com".to_string(),
                "bob@example.com ".to_string(),
            ],
            ..common::new_project("  Launch  ")
        })
        .await
        .expect("Failed to save project");

    assert_eq!(project.title, "Launch");
    assert_eq!(project.status, ProjectStatus::Active);
    assert!(project.columns.is_empty());
    let emails: Vec<&str> = project
        .team_members
        .iter()
        .map(|member| member.email.as_str())
        .collect();
    assert_eq!(emails, vec!["alice@example.com", "bob@example.com"]);
    let stored = team_member::Entity::find().count(&state.db).await.unwrap();
    assert_eq!(stored, 2);
}

#[tokio::test]
async fn cannot_save_project_with_duplicate_title() {
    let state = setup().await.expect("Failed to setup test context");
    let service = ProjectService::new(&state.db);
    common::create_project(&state.db, "Launch").await;

    let result = service.save_project(common::new_project("Launch")).await;

    assert!(matches!(result, Err(ProjectServiceError::DuplicateTitle(title)) if title == "Launch"));
    let stored = project::Entity::find().count(&state.db).await.unwrap();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn cannot_save_project_without_team() {
    let state = setup().await.expect("Failed to setup test context");
    let service = ProjectService::new(&state.db);

    let result = service
        .save_project(NewProject {
            team_members: Vec::new(),
            ..common::new_project("Launch")
        })
        .await;

    assert!(matches!(result, Err(ProjectServiceError::Validation(_))));
    let stored = project::Entity::find().count(&state.db).await.unwrap();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn can_list_projects_of_owner() {
    let state = setup().await.expect("Failed to setup test context");
    let service = ProjectService::new(&state.db);
    let launch = common::create_project(&state.db, "Launch").await;
    common::create_project(&state.db, "Rollout").await;
    service
        .save_project(NewProject {
            owner: Some("someone@example.com".to_string()),
            ..common::new_project("Elsewhere")
        })
        .await
        .unwrap();
    let column = OrderAssignmentService::new(&state.db)
        .add_column(NewColumn {
            title: Some("Todo".to_string()),
            project_id: Some(launch.id),
            heading_color: None,
        })
        .await
        .unwrap();

    let projects = service.get_user_projects("owner@example.com").await.unwrap();

    let titles: Vec<&str> = projects.iter().map(|project| project.title.as_str()).collect();
    assert_eq!(titles, vec!["Launch", "Rollout"]);
    assert_eq!(projects[0].columns, vec![column.column.id]);
    assert_eq!(projects[0].team_members.len(), 1);
}

#[tokio::test]
async fn cannot_list_projects_of_owner_without_any() {
    let state = setup().await.expect("Failed to setup test context");
    let service = ProjectService::new(&state.db);

    let result = service.get_user_projects("nobody@example.com").await;

    assert!(matches!(result, Err(ProjectServiceError::NoProjectsForOwner(_))));
}

#[tokio::test]
async fn can_read_project_with_populated_columns() {
    let state = setup().await.expect("Failed to setup test context");
    let service = ProjectService::new(&state.db);
    let orders = OrderAssignmentService::new(&state.db);
    let project = common::create_project(&state.db, "Launch").await;
    let backlog = orders
        .add_column(NewColumn {
            title: Some("Backlog".to_string()),
            project_id: Some(project.id),
            heading_color: None,
        })
        .await
        .unwrap();
    for title in ["Fix bug", "Write docs"] {
        orders
            .add_card(NewCard {
                title: Some(title.to_string()),
                column_id: Some(backlog.column.id),
            })
            .await
            .unwrap();
    }

    let detail = service.get_project(project.id).await.unwrap();

    assert_eq!(detail.title, "Launch");
    assert_eq!(detail.columns.len(), 1);
    let mut cards: Vec<(String, i32)> = detail.columns[0]
        .cards
        .iter()
        .map(|card| (card.title.clone(), card.order))
        .collect();
    cards.sort_by_key(|(_, order)| *order);
    assert_eq!(
        cards,
        vec![("Fix bug".to_string(), 0), ("Write docs".to_string(), 1)]
    );
}

#[tokio::test]
async fn can_read_board_in_display_order() {
    let state = setup().await.expect("Failed to setup test context");
    let orders = OrderAssignmentService::new(&state.db);
    let project = common::create_project(&state.db, "Launch").await;
    let mut column_keys = Vec::new();
    for title in ["Backlog", "Todo", "Done"] {
        let created = orders
            .add_column(NewColumn {
                title: Some(title.to_string()),
                project_id: Some(project.id),
                heading_color: None,
            })
            .await
            .unwrap();
        column_keys.push((created.column.id, created.column.column_id));
    }
    let (todo_id, todo_key) = column_keys[1].clone();
    for title in ["Fix bug", "Write docs"] {
        orders
            .add_card(NewCard {
                title: Some(title.to_string()),
                column_id: Some(todo_id),
            })
            .await
            .unwrap();
    }

    let board = ProjectService::new(&state.db)
        .get_board(project.id)
        .await
        .unwrap();

    let titles: Vec<&str> = board.columns().iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Backlog", "Todo", "Done"]);
    let cards: Vec<&str> = board
        .cards_in(&todo_key)
        .iter()
        .map(|card| card.title.as_str())
        .collect();
    assert_eq!(cards, vec!["Fix bug", "Write docs"]);
    assert_eq!(board.card_count(), 2);
}

#[tokio::test]
async fn cannot_read_missing_project() {
    let state = setup().await.expect("Failed to setup test context");
    let missing = Uuid::new_v4();

    let result = ProjectService::new(&state.db).get_project(missing).await;

    assert!(matches!(result, Err(ProjectServiceError::ProjectNotFound(id)) if id == missing));
}
