// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::domain::feed::RawArticle;

/// 新闻文章实体
///
/// 一篇已持久化的文章，永远隶属于某个搜索范围。
/// 同一范围内 (published_at, title) 不会重复。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// 文章唯一标识符
    pub id: Uuid,
    /// 所属搜索范围ID
    pub scope_id: Uuid,
    /// 标题
    pub title: String,
    /// 摘要
    pub description: String,
    /// 原文链接
    pub url: String,
    /// 配图链接
    pub image_url: Option<String>,
    /// 发布时间
    pub published_at: DateTime<Utc>,
    /// 来源名称
    pub source_name: String,
    /// 来源分类
    pub source_category: Option<String>,
    /// 语言代码
    pub language: String,
    /// 入库时间
    pub created_at: DateTime<Utc>,
}

/// 待入库的文章
///
/// 由上游原始条目解析而来，尚未分配ID。
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub scope_id: Uuid,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source_name: String,
    pub source_category: Option<String>,
    pub language: String,
}

/// 文章解析错误
///
/// 上游条目缺少必备字段或字段无法解析时产生，
/// 此类条目会被跳过而不会中断整批入库。
#[derive(Error, Debug)]
pub enum ArticleParseError {
    /// 缺少标题
    #[error("missing title")]
    MissingTitle,

    /// 缺少摘要
    #[error("missing description")]
    MissingDescription,

    /// 缺少原文链接
    #[error("missing url")]
    MissingUrl,

    /// 原文链接不是合法URL
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// 缺少来源名称
    #[error("missing source name")]
    MissingSourceName,

    /// 缺少发布时间
    #[error("missing publication timestamp")]
    MissingPublishedAt,

    /// 发布时间无法解析
    #[error("unparseable publication timestamp: {0}")]
    InvalidPublishedAt(String),
}

impl NewArticle {
    /// 将上游原始条目解析为待入库文章
    ///
    /// 标题、摘要、链接、来源名称、发布时间缺一不可；
    /// 发布时间须为 RFC 3339 格式，链接须为合法URL。
    /// 语言缺失时记为 "en"。
    pub fn from_raw(scope_id: Uuid, raw: &RawArticle) -> Result<Self, ArticleParseError> {
        let title = raw
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ArticleParseError::MissingTitle)?;
        let description = raw
            .description
            .as_deref()
            .ok_or(ArticleParseError::MissingDescription)?;
        let url = raw
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ArticleParseError::MissingUrl)?;
        Url::parse(url).map_err(|_| ArticleParseError::InvalidUrl(url.to_string()))?;
        let source_name = raw
            .source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .ok_or(ArticleParseError::MissingSourceName)?;
        let published_raw = raw
            .published_at
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(ArticleParseError::MissingPublishedAt)?;
        let published_at = DateTime::parse_from_rfc3339(published_raw)
            .map_err(|_| ArticleParseError::InvalidPublishedAt(published_raw.to_string()))?
            .with_timezone(&Utc);

        Ok(Self {
            scope_id,
            title: title.to_string(),
            description: description.to_string(),
            url: url.to_string(),
            image_url: raw.image_url.clone(),
            published_at,
            source_name: source_name.to_string(),
            source_category: raw.source.as_ref().and_then(|s| s.category.clone()),
            language: raw.language.clone().unwrap_or_else(|| "en".to_string()),
        })
    }
}
