// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::search_scope::SearchScope;
use crate::domain::repositories::scope_repository::{
    KeywordCount, ScopeRepository, ScopeRepositoryError,
};
use crate::infrastructure::database::entities::search_scope as scope_entity;

/// 搜索范围仓库实现
///
/// 基于SeaORM实现的搜索范围数据访问层
#[derive(Clone)]
pub struct ScopeRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ScopeRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<scope_entity::Model> for SearchScope {
    fn from(model: scope_entity::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            keyword: model.keyword,
            last_searched_at: model.last_searched_at.with_timezone(&Utc),
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<&SearchScope> for scope_entity::ActiveModel {
    fn from(scope: &SearchScope) -> Self {
        Self {
            id: Set(scope.id),
            user_id: Set(scope.user_id),
            keyword: Set(scope.keyword.clone()),
            last_searched_at: Set(scope.last_searched_at.fixed_offset()),
            is_active: Set(scope.is_active),
            created_at: Set(scope.created_at.fixed_offset()),
        }
    }
}

/// 关键词聚合查询的结果行
#[derive(Debug, FromQueryResult)]
struct KeywordCountRow {
    keyword: String,
    count: i64,
}

#[async_trait]
impl ScopeRepository for ScopeRepositoryImpl {
    async fn find_by_user_and_keyword(
        &self,
        user_id: Uuid,
        keyword: &str,
    ) -> Result<Option<SearchScope>, ScopeRepositoryError> {
        let model = scope_entity::Entity::find()
            .filter(scope_entity::Column::UserId.eq(user_id))
            .filter(scope_entity::Column::Keyword.eq(keyword))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn create(&self, scope: &SearchScope) -> Result<SearchScope, ScopeRepositoryError> {
        let model: scope_entity::ActiveModel = scope.into();
        match model.insert(self.db.as_ref()).await {
            Ok(inserted) => Ok(inserted.into()),
            Err(e) => match e.sql_err() {
                // (user_id, keyword) 唯一索引，冲突即并发创建竞态
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(ScopeRepositoryError::AlreadyExists)
                }
                _ => Err(e.into()),
            },
        }
    }

    async fn touch(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ScopeRepositoryError> {
        let result = scope_entity::Entity::update_many()
            .col_expr(
                scope_entity::Column::LastSearchedAt,
                Expr::value(at.fixed_offset()),
            )
            .filter(scope_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(ScopeRepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SearchScope>, ScopeRepositoryError> {
        let models = scope_entity::Entity::find()
            .filter(scope_entity::Column::UserId.eq(user_id))
            .order_by_desc(scope_entity::Column::LastSearchedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn top_keywords(&self, limit: u64) -> Result<Vec<KeywordCount>, ScopeRepositoryError> {
        let rows = scope_entity::Entity::find()
            .select_only()
            .column(scope_entity::Column::Keyword)
            .column_as(scope_entity::Column::Keyword.count(), "count")
            .group_by(scope_entity::Column::Keyword)
            .order_by_desc(scope_entity::Column::Keyword.count())
            .limit(limit)
            .into_model::<KeywordCountRow>()
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| KeywordCount {
                keyword: row.keyword,
                count: row.count,
            })
            .collect())
    }
}
