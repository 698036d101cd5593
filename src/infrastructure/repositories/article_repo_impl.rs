// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::models::article::{Article, NewArticle};
use crate::domain::repositories::article_repository::{
    ArticleFilter, ArticleRepository, ArticleRepositoryError,
};
use crate::infrastructure::database::entities::article as article_entity;

/// 文章仓库实现
///
/// 基于SeaORM实现的文章数据访问层
#[derive(Clone)]
pub struct ArticleRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ArticleRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<article_entity::Model> for Article {
    fn from(model: article_entity::Model) -> Self {
        Self {
            id: model.id,
            scope_id: model.scope_id,
            title: model.title,
            description: model.description,
            url: model.url,
            image_url: model.image_url,
            published_at: model.published_at.with_timezone(&Utc),
            source_name: model.source_name,
            source_category: model.source_category,
            language: model.language,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<&NewArticle> for article_entity::ActiveModel {
    fn from(article: &NewArticle) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            scope_id: Set(article.scope_id),
            title: Set(article.title.clone()),
            description: Set(article.description.clone()),
            url: Set(article.url.clone()),
            image_url: Set(article.image_url.clone()),
            published_at: Set(article.published_at.fixed_offset()),
            source_name: Set(article.source_name.clone()),
            source_category: Set(article.source_category.clone()),
            language: Set(article.language.clone()),
            created_at: Set(Utc::now().fixed_offset()),
        }
    }
}

/// 日期过滤按整天计：某天的下界是当天 UTC 零点
fn day_floor(date: NaiveDate) -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[async_trait]
impl ArticleRepository for ArticleRepositoryImpl {
    async fn list_by_scope(
        &self,
        scope_id: Uuid,
        filter: &ArticleFilter,
    ) -> Result<Vec<Article>, ArticleRepositoryError> {
        let mut query = article_entity::Entity::find()
            .filter(article_entity::Column::ScopeId.eq(scope_id))
            .order_by_desc(article_entity::Column::PublishedAt);

        if let Some(source_name) = &filter.source_name {
            query = query.filter(article_entity::Column::SourceName.eq(source_name.clone()));
        }
        if let Some(language) = &filter.language {
            query = query.filter(article_entity::Column::Language.eq(language.clone()));
        }
        if let Some(after) = filter.published_after {
            query = query
                .filter(article_entity::Column::PublishedAt.gte(day_floor(after).fixed_offset()));
        }
        if let Some(before) = filter.published_before {
            // 包含 before 当天整天，上界取次日零点（开区间）
            if let Some(next_day) = before.succ_opt() {
                query = query.filter(
                    article_entity::Column::PublishedAt.lt(day_floor(next_day).fixed_offset()),
                );
            }
        }

        let models = query.all(self.db.as_ref()).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn latest_by_scope(
        &self,
        scope_id: Uuid,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let model = article_entity::Entity::find()
            .filter(article_entity::Column::ScopeId.eq(scope_id))
            .order_by_desc(article_entity::Column::PublishedAt)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn bulk_insert(
        &self,
        articles: Vec<NewArticle>,
    ) -> Result<u64, ArticleRepositoryError> {
        let mut inserted = 0u64;

        for article in &articles {
            let duplicates = article_entity::Entity::find()
                .filter(article_entity::Column::ScopeId.eq(article.scope_id))
                .filter(article_entity::Column::PublishedAt.eq(article.published_at.fixed_offset()))
                .filter(article_entity::Column::Title.eq(article.title.clone()))
                .count(self.db.as_ref())
                .await?;
            if duplicates > 0 {
                debug!("Skipping duplicate article '{}'", article.title);
                continue;
            }

            let model: article_entity::ActiveModel = article.into();
            match model.insert(self.db.as_ref()).await {
                Ok(_) => inserted += 1,
                Err(e) => match e.sql_err() {
                    // 与并发写入方撞上唯一索引，按重复处理
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        debug!("Skipping concurrently inserted article '{}'", article.title);
                    }
                    _ => return Err(e.into()),
                },
            }
        }

        Ok(inserted)
    }
}
