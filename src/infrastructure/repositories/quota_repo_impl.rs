// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::quota::UserQuota;
use crate::domain::repositories::quota_repository::{QuotaRepository, QuotaRepositoryError};
use crate::infrastructure::database::entities::user_quota as quota_entity;

/// 配额仓库实现
///
/// 基于SeaORM实现的配额数据访问层。消耗操作用值比较的
/// 乐观并发循环实现，不依赖数据库方言的原子自增语法。
#[derive(Clone)]
pub struct QuotaRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl QuotaRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<quota_entity::Model> for UserQuota {
    fn from(model: quota_entity::Model) -> Self {
        Self {
            user_id: model.user_id,
            quota_limit: model.quota_limit,
            used_quota: model.used_quota,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[async_trait]
impl QuotaRepository for QuotaRepositoryImpl {
    async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserQuota>, QuotaRepositoryError> {
        let model = quota_entity::Entity::find_by_id(user_id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn create(&self, user_id: Uuid, limit: i32) -> Result<UserQuota, QuotaRepositoryError> {
        let now = Utc::now().fixed_offset();
        let model = quota_entity::ActiveModel {
            user_id: Set(user_id),
            quota_limit: Set(limit),
            used_quota: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn set_limit(
        &self,
        user_id: Uuid,
        limit: i32,
    ) -> Result<UserQuota, QuotaRepositoryError> {
        let now = Utc::now().fixed_offset();
        let updated = quota_entity::Entity::update_many()
            .col_expr(quota_entity::Column::QuotaLimit, Expr::value(limit))
            .col_expr(quota_entity::Column::UpdatedAt, Expr::value(now))
            .filter(quota_entity::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await?;

        if updated.rows_affected == 0 {
            let fresh = quota_entity::ActiveModel {
                user_id: Set(user_id),
                quota_limit: Set(limit),
                used_quota: Set(0),
                created_at: Set(now),
                updated_at: Set(now),
            };
            if let Err(e) = fresh.insert(self.db.as_ref()).await {
                match e.sql_err() {
                    // 并发补建的败者改走更新路径，此时行一定存在
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        quota_entity::Entity::update_many()
                            .col_expr(quota_entity::Column::QuotaLimit, Expr::value(limit))
                            .col_expr(quota_entity::Column::UpdatedAt, Expr::value(now))
                            .filter(quota_entity::Column::UserId.eq(user_id))
                            .exec(self.db.as_ref())
                            .await?;
                    }
                    _ => return Err(e.into()),
                }
            }
        }

        self.find_by_user(user_id)
            .await?
            .ok_or(QuotaRepositoryError::NotFound(user_id))
    }

    async fn try_consume(
        &self,
        user_id: Uuid,
        enforce_limit: bool,
    ) -> Result<bool, QuotaRepositoryError> {
        loop {
            // 无配额行（员工账号）没有可消耗的计数，按拒绝处理
            let Some(current) = quota_entity::Entity::find_by_id(user_id)
                .one(self.db.as_ref())
                .await?
            else {
                return Ok(false);
            };

            if enforce_limit && current.used_quota >= current.quota_limit {
                return Ok(false);
            }

            // 带旧值条件的更新：换人改过就会打空，重读再试
            let result = quota_entity::Entity::update_many()
                .col_expr(
                    quota_entity::Column::UsedQuota,
                    Expr::value(current.used_quota + 1),
                )
                .col_expr(
                    quota_entity::Column::UpdatedAt,
                    Expr::value(Utc::now().fixed_offset()),
                )
                .filter(quota_entity::Column::UserId.eq(user_id))
                .filter(quota_entity::Column::UsedQuota.eq(current.used_quota))
                .exec(self.db.as_ref())
                .await?;

            if result.rows_affected == 1 {
                return Ok(true);
            }
        }
    }
}
