use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BoardColumn::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BoardColumn::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BoardColumn::Title).string().not_null())
                    .col(
                        ColumnDef::new(BoardColumn::ColumnKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(BoardColumn::HeadingColor)
                            .string()
                            .not_null()
                            .default("#e2e8f0"),
                    )
                    .col(ColumnDef::new(BoardColumn::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(BoardColumn::SortOrder).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_board_columns_project")
                            .from(BoardColumn::Table, BoardColumn::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Card::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Card::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Card::Title).string().not_null())
                    .col(
                        ColumnDef::new(Card::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Card::ColumnId).uuid().not_null())
                    .col(ColumnDef::new(Card::AssignedTo).string())
                    .col(ColumnDef::new(Card::SortOrder).integer().not_null())
                    .col(
                        ColumnDef::new(Card::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cards_board_column")
                            .from(Card::Table, Card::ColumnId)
                            .to(BoardColumn::Table, BoardColumn::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Card::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BoardColumn::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Project {
    #[sea_orm(iden = "projects")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum BoardColumn {
    #[sea_orm(iden = "board_columns")]
    Table,
    Id,
    Title,
    ColumnKey,
    HeadingColor,
    ProjectId,
    SortOrder,
}

#[derive(DeriveIden)]
enum Card {
    #[sea_orm(iden = "cards")]
    Table,
    Id,
    Title,
    Description,
    ColumnId,
    AssignedTo,
    SortOrder,
    CreatedAt,
}
