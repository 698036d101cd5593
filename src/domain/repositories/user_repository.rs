// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::user::User;

/// 用户仓库错误类型
#[derive(Error, Debug)]
pub enum UserRepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 用户不存在
    #[error("User not found")]
    NotFound,
    /// 用户名已被占用
    #[error("Username already taken")]
    AlreadyExists,
}

/// 用户仓库特质
///
/// 定义用户及其会话令牌的数据访问接口
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建新用户，用户名冲突时返回 AlreadyExists
    async fn create(&self, user: &User) -> Result<User, UserRepositoryError>;
    /// 根据ID查找用户
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError>;
    /// 根据用户名查找用户
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError>;
    /// 列出全部非员工用户，按创建时间排序
    async fn list_non_staff(&self) -> Result<Vec<User>, UserRepositoryError>;
    /// 更新用户标志位，None 表示保持原值
    async fn update_flags(
        &self,
        id: Uuid,
        is_staff: Option<bool>,
        is_active: Option<bool>,
    ) -> Result<User, UserRepositoryError>;
    /// 为用户签发会话令牌
    async fn insert_token(&self, user_id: Uuid, token: &str) -> Result<(), UserRepositoryError>;
    /// 记录最近一次登录时间
    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), UserRepositoryError>;
}
