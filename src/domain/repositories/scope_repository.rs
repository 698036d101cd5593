// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::search_scope::SearchScope;

/// 搜索范围仓库错误类型
#[derive(Error, Debug)]
pub enum ScopeRepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// (user_id, keyword) 已存在，并发创建时的败者收到此错误
    #[error("Scope already exists for this user and keyword")]
    AlreadyExists,
    /// 范围不存在
    #[error("Scope not found")]
    NotFound,
}

/// 关键词热度统计行
#[derive(Debug, Clone, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: i64,
}

/// 搜索范围仓库特质
///
/// 定义搜索范围的数据访问接口
#[async_trait]
pub trait ScopeRepository: Send + Sync {
    /// 查找某用户某关键词的范围
    async fn find_by_user_and_keyword(
        &self,
        user_id: Uuid,
        keyword: &str,
    ) -> Result<Option<SearchScope>, ScopeRepositoryError>;
    /// 创建新范围，唯一索引冲突时返回 AlreadyExists
    async fn create(&self, scope: &SearchScope) -> Result<SearchScope, ScopeRepositoryError>;
    /// 刷新范围的最近抓取时间
    async fn touch(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ScopeRepositoryError>;
    /// 列出某用户的全部范围，按最近抓取时间倒序
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<SearchScope>, ScopeRepositoryError>;
    /// 统计全系统被搜索次数最多的关键词
    async fn top_keywords(&self, limit: u64) -> Result<Vec<KeywordCount>, ScopeRepositoryError>;
}
