use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create articles table
        manager
            .create_table(
                Table::create()
                    .table(Articles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Articles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Articles::ScopeId).uuid().not_null())
                    .col(ColumnDef::new(Articles::Title).string().not_null())
                    .col(ColumnDef::new(Articles::Description).text().not_null())
                    .col(ColumnDef::new(Articles::Url).string().not_null())
                    .col(ColumnDef::new(Articles::ImageUrl).string())
                    .col(
                        ColumnDef::new(Articles::PublishedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Articles::SourceName).string().not_null())
                    .col(ColumnDef::new(Articles::SourceCategory).string())
                    .col(
                        ColumnDef::new(Articles::Language)
                            .string()
                            .not_null()
                            .default("en"),
                    )
                    .col(
                        ColumnDef::new(Articles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_articles_scope")
                            .from(Articles::Table, Articles::ScopeId)
                            .to(SearchScopes::Table, SearchScopes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Dedup guard: the same story may never land twice in one scope
        manager
            .create_index(
                Index::create()
                    .name("idx_articles_scope_published_title")
                    .table(Articles::Table)
                    .col(Articles::ScopeId)
                    .col(Articles::PublishedAt)
                    .col(Articles::Title)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Articles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Articles {
    Table,
    Id,
    ScopeId,
    Title,
    Description,
    Url,
    ImageUrl,
    PublishedAt,
    SourceName,
    SourceCategory,
    Language,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SearchScopes {
    Table,
    Id,
}
