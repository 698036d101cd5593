// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::article::{Article, NewArticle};

/// 文章仓库错误类型
#[derive(Error, Debug)]
pub enum ArticleRepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// 文章查询过滤条件
///
/// 日期过滤按整天计（UTC），published_after 包含当天零点起、
/// published_before 包含当天整天。
#[derive(Debug, Default, Clone)]
pub struct ArticleFilter {
    pub source_name: Option<String>,
    pub language: Option<String>,
    pub published_after: Option<NaiveDate>,
    pub published_before: Option<NaiveDate>,
}

/// 文章仓库特质
///
/// 定义文章的数据访问接口
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// 按过滤条件列出范围内的文章，发布时间倒序
    async fn list_by_scope(
        &self,
        scope_id: Uuid,
        filter: &ArticleFilter,
    ) -> Result<Vec<Article>, ArticleRepositoryError>;
    /// 取范围内发布时间最新的一篇文章，用作增量水位线
    async fn latest_by_scope(&self, scope_id: Uuid)
        -> Result<Option<Article>, ArticleRepositoryError>;
    /// 批量入库，逐条处理：重复或失败的条目跳过并记日志，
    /// 返回实际插入的条数
    async fn bulk_insert(&self, articles: Vec<NewArticle>)
        -> Result<u64, ArticleRepositoryError>;
}
