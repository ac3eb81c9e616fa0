use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Two concurrent inserts can read the same max order. These indexes make the
// second commit fail so the caller can retry.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_board_columns_project_sort_order")
                    .table(BoardColumn::Table)
                    .col(BoardColumn::ProjectId)
                    .col(BoardColumn::SortOrder)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cards_column_sort_order")
                    .table(Card::Table)
                    .col(Card::ColumnId)
                    .col(Card::SortOrder)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_cards_column_sort_order")
                    .table(Card::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_board_columns_project_sort_order")
                    .table(BoardColumn::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum BoardColumn {
    #[sea_orm(iden = "board_columns")]
    Table,
    ProjectId,
    SortOrder,
}

#[derive(DeriveIden)]
enum Card {
    #[sea_orm(iden = "cards")]
    Table,
    ColumnId,
    SortOrder,
}
