use migration::MigratorTrait;
use planboard_server::project::{NewProject, Project, ProjectService};
use sea_orm::{Database, DatabaseConnection};
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::{postgres, testcontainers};

pub async fn setup_container() -> anyhow::Result<testcontainers::ContainerAsync<postgres::Postgres>>
{
    let container = postgres::Postgres::default().start().await?;
    Ok(container)
}

pub async fn setup_db(
    container: &testcontainers::ContainerAsync<postgres::Postgres>,
) -> anyhow::Result<DatabaseConnection> {
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let db_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);
    let db = Database::connect(&db_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Request for a valid project owned by `owner@example.com`.
#[allow(dead_code)]
pub fn new_project(title: &str) -> NewProject {
    NewProject {
        title: Some(title.to_string()),
        description: Some(format!("{title} description")),
        deadline: None,
        owner: Some("owner@example.com".to_string()),
        team_members: vec!["alice@example.com".to_string()],
        status: None,
    }
}

/// Inserts a project through the service.
#[allow(dead_code)]
pub async fn create_project(db: &DatabaseConnection, title: &str) -> Project {
    ProjectService::new(db)
        .save_project(new_project(title))
        .await
        .expect("Failed to create project")
}
