use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index for articles: watermark lookup scans a scope newest-first
        manager
            .create_index(
                Index::create()
                    .name("idx_articles_scope_published_at")
                    .table(Articles::Table)
                    .col(Articles::ScopeId)
                    .col(Articles::PublishedAt)
                    .to_owned(),
            )
            .await?;

        // Secondary filter columns used by result listing
        manager
            .create_index(
                Index::create()
                    .name("idx_articles_source_name")
                    .table(Articles::Table)
                    .col(Articles::SourceName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_articles_language")
                    .table(Articles::Table)
                    .col(Articles::Language)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_articles_language").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_articles_source_name").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_articles_scope_published_at").to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Articles {
    Table,
    ScopeId,
    SourceName,
    PublishedAt,
    Language,
}
