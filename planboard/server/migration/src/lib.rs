pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_project_tables;
mod m20250901_000002_create_board_tables;
mod m20250914_093012_add_sort_order_unique_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_project_tables::Migration),
            Box::new(m20250901_000002_create_board_tables::Migration),
            Box::new(m20250914_093012_add_sort_order_unique_indexes::Migration),
        ]
    }
}
