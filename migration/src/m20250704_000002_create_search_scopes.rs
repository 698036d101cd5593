use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create search_scopes table
        manager
            .create_table(
                Table::create()
                    .table(SearchScopes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SearchScopes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SearchScopes::UserId).uuid().not_null())
                    .col(ColumnDef::new(SearchScopes::Keyword).string().not_null())
                    .col(
                        ColumnDef::new(SearchScopes::LastSearchedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SearchScopes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SearchScopes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_search_scopes_user")
                            .from(SearchScopes::Table, SearchScopes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One scope per (user, keyword); concurrent creators race on this index
        manager
            .create_index(
                Index::create()
                    .name("idx_search_scopes_user_keyword")
                    .table(SearchScopes::Table)
                    .col(SearchScopes::UserId)
                    .col(SearchScopes::Keyword)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SearchScopes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SearchScopes {
    Table,
    Id,
    UserId,
    Keyword,
    LastSearchedAt,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
