// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::quota::UserQuota;

/// 配额仓库错误类型
#[derive(Error, Debug)]
pub enum QuotaRepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 配额记录不存在
    #[error("Quota not found for user: {0}")]
    NotFound(Uuid),
}

/// 配额仓库特质
///
/// 定义用户搜索配额的数据访问接口
#[async_trait]
pub trait QuotaRepository: Send + Sync {
    /// 查找某用户的配额记录
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<UserQuota>, QuotaRepositoryError>;
    /// 为用户创建配额记录
    async fn create(&self, user_id: Uuid, limit: i32) -> Result<UserQuota, QuotaRepositoryError>;
    /// 调整用户限额，记录不存在时先创建
    async fn set_limit(&self, user_id: Uuid, limit: i32) -> Result<UserQuota, QuotaRepositoryError>;
    /// 原子地消耗一次配额
    ///
    /// `enforce_limit` 为 true 时，已用量达到限额则不消耗并返回 false；
    /// 为 false（员工）时无条件消耗。没有配额行可供计数时同样返回
    /// false。并发调用下每次成功恰好加一，不会超卖。
    async fn try_consume(
        &self,
        user_id: Uuid,
        enforce_limit: bool,
    ) -> Result<bool, QuotaRepositoryError>;
}
