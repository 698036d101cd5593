// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// 上游抓取错误
#[derive(Debug, Error, Clone)]
pub enum FeedError {
    /// 网络层失败（连接、超时等）
    #[error("Network error: {0}")]
    Network(String),
    /// 上游返回非成功状态码
    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),
    /// 响应体无法解析
    #[error("Malformed upstream response: {0}")]
    Malformed(String),
}

/// 上游返回的原始新闻条目
///
/// 所有字段都是可选的：上游数据质量参差不齐，解析阶段
/// 不做任何校验，由入库前的转换统一判定哪些条目可用。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    pub source: Option<RawSource>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "urlToImage")]
    pub image_url: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub language: Option<String>,
}

/// 上游条目的来源信息
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    pub name: Option<String>,
    pub category: Option<String>,
}

/// 新闻数据源客户端
///
/// 对上游新闻接口的抽象，单次调用按关键词抓取一批条目。
/// 实现不做重试，失败原样上抛由编排层决定如何响应。
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// 按关键词抓取新闻条目
    ///
    /// # 参数
    ///
    /// * `keyword` - 搜索关键词
    /// * `since` - 增量水位线，Some 时只要不早于该时刻的条目
    ///
    /// # 返回值
    ///
    /// 上游返回的原始条目列表，顺序与上游一致
    async fn fetch(
        &self,
        keyword: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RawArticle>, FeedError>;
}
