use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use insta::assert_yaml_snapshot;
use planboard_server::config::Config;
use planboard_server::web::create_app;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{Value, json};
use testcontainers_modules::{postgres, testcontainers};
use tower::ServiceExt;

mod common;

/// Test context for endpoint tests.
pub struct TestContext {
    #[allow(dead_code)] // container is kept to ensure it's not dropped
    pub container: testcontainers::ContainerAsync<postgres::Postgres>,
    pub db: DatabaseConnection,
}

/// JSON response snapshot for testing endpoints.
#[derive(Debug, Serialize)]
struct JsonResponseSnapshot {
    status: u16,
    body: Value,
}

async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let container = common::setup_container().await?;
    let db = common::setup_db(&container).await?;
    Ok(TestContext { db, container })
}

fn app(db: DatabaseConnection) -> Router {
    let config = Config {
        db_url: String::new(),
        port: 8080,
        client_origin: "http://localhost:8080".to_string(),
        order_retry_limit: 3,
    };
    create_app(&config, db).expect("Failed to build app")
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn project_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Ship the board",
        "owner": "owner@example.com",
        "teamMembers": ["alice@example.com"]
    })
}

#[tokio::test]
async fn can_build_board_through_api() {
    let state = setup().await.expect("Failed to setup test context");
    let app = app(state.db);

    let (status, project) = send(&app, Method::POST, "/api/v1/projects", Some(project_body("Launch"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(project["status"], "Active");
    let project_id = project["id"].as_str().unwrap().to_string();

    let mut columns = Vec::new();
    for title in ["Backlog", "Todo"] {
        let (status, created) = send(
            &app,
            Method::POST,
            "/api/v1/columns",
            Some(json!({"title": title, "projectId": project_id, "headingColor": "#F2C80F"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["cards"], json!([]));
        columns.push(created["column"].clone());
    }
    assert_eq!(columns[0]["order"], 0);
    assert_eq!(columns[1]["order"], 1);
    assert_eq!(columns[1]["headingColor"], "#F2C80F");

    let todo_id = columns[1]["id"].as_str().unwrap().to_string();
    let mut cards = Vec::new();
    for title in ["Fix bug", "Write docs"] {
        let (status, created) = send(
            &app,
            Method::POST,
            "/api/v1/cards",
            Some(json!({"title": title, "columnId": todo_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["column"]["id"], todo_id.as_str());
        cards.push(created["card"].clone());
    }
    assert_eq!(cards[0]["order"], 0);
    assert_eq!(cards[1]["order"], 1);

    let (status, board) = send(
        &app,
        Method::GET,
        &format!("/api/v1/projects/{project_id}/board"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["columns"][0]["title"], "Backlog");
    assert_eq!(board["columns"][1]["cards"][0]["title"], "Fix bug");
    assert_eq!(board["columns"][1]["cards"][1]["title"], "Write docs");

    let (status, listed) = send(
        &app,
        Method::GET,
        "/api/v1/projects?owner=owner@example.com",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["projects"][0]["columns"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn can_read_populated_project() {
    let state = setup().await.expect("Failed to setup test context");
    let project = common::create_project(&state.db, "Launch").await;
    let app = app(state.db);
    send(
        &app,
        Method::POST,
        "/api/v1/columns",
        Some(json!({"title": "Backlog", "projectId": project.id})),
    )
    .await;

    let (status, detail) = send(&app, Method::GET, &format!("/api/v1/projects/{}", project.id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["teamMembers"], json!([{"email": "alice@example.com"}]));
    assert_eq!(detail["columns"][0]["title"], "Backlog");
    assert_eq!(detail["columns"][0]["headingColor"], "#e2e8f0");
    assert_eq!(detail["columns"][0]["order"], 0);
    assert_eq!(detail["columns"][0]["cards"], json!([]));
}

#[tokio::test]
async fn cannot_add_column_without_title() {
    let state = setup().await.expect("Failed to setup test context");
    let project = common::create_project(&state.db, "Launch").await;
    let app = app(state.db);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/columns",
        Some(json!({"projectId": project.id})),
    )
    .await;

    assert_yaml_snapshot!(JsonResponseSnapshot { status: status.as_u16(), body }, @r"
    status: 400
    body:
      error: VALIDATION_ERROR
      message: Title and projectId are required
    ");
}

#[tokio::test]
async fn cannot_add_card_to_missing_column() {
    let state = setup().await.expect("Failed to setup test context");
    let app = app(state.db);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/cards",
        Some(json!({"title": "Fix bug", "columnId": "00000000-0000-0000-0000-000000000000"})),
    )
    .await;

    assert_yaml_snapshot!(JsonResponseSnapshot { status: status.as_u16(), body }, @r"
    status: 404
    body:
      error: NOT_FOUND
      message: Column 00000000-0000-0000-0000-000000000000 not found
    ");
}

#[tokio::test]
async fn cannot_save_project_with_duplicate_title() {
    let state = setup().await.expect("Failed to setup test context");
    let app = app(state.db);
    send(&app, Method::POST, "/api/v1/projects", Some(project_body("Launch"))).await;

    let (status, body) = send(&app, Method::POST, "/api/v1/projects", Some(project_body("Launch"))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn cannot_list_projects_for_unknown_owner() {
    let state = setup().await.expect("Failed to setup test context");
    let app = app(state.db);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/projects?owner=nobody@example.com",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn cannot_read_project_with_malformed_id() {
    let state = setup().await.expect("Failed to setup test context");
    let app = app(state.db);

    let (status, body) = send(&app, Method::GET, "/api/v1/projects/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}
