// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::search_request::SearchRequestDto;
use crate::domain::feed::{FeedClient, FeedError};
use crate::domain::models::article::{Article, NewArticle};
use crate::domain::models::search_scope::SearchScope;
use crate::domain::models::user::AuthUser;
use crate::domain::repositories::article_repository::{ArticleRepository, ArticleRepositoryError};
use crate::domain::repositories::quota_repository::{QuotaRepository, QuotaRepositoryError};
use crate::domain::repositories::scope_repository::{ScopeRepository, ScopeRepositoryError};
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use validator::Validate;

/// 搜索服务错误
#[derive(Error, Debug)]
pub enum SearchServiceError {
    /// 配额已用尽
    #[error("Quota limit reached")]
    QuotaExceeded,
    /// 请求参数校验失败
    #[error("Invalid search parameters")]
    Validation(validator::ValidationErrors),
    /// 上游抓取失败
    #[error("Error fetching news from API: {0}")]
    Upstream(FeedError),
    /// 范围仓库错误
    #[error("Repository error: {0}")]
    Scope(#[from] ScopeRepositoryError),
    /// 文章仓库错误
    #[error("Repository error: {0}")]
    Article(#[from] ArticleRepositoryError),
    /// 配额仓库错误
    #[error("Repository error: {0}")]
    Quota(#[from] QuotaRepositoryError),
}

/// 结果来源标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    /// 新鲜度窗口内的缓存命中，未调用上游
    Cache,
    /// 经过一次上游抓取
    Api,
}

impl SearchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSource::Cache => "cache",
            SearchSource::Api => "api",
        }
    }
}

/// 搜索结果
#[derive(Debug)]
pub struct SearchOutcome {
    /// 规范化后的关键词
    pub keyword: String,
    /// 数据来源
    pub source: SearchSource,
    /// 过滤后的文章，发布时间倒序
    pub articles: Vec<Article>,
}

/// 新闻搜索服务
///
/// 系统的核心编排：配额闸门、缓存命中判断、范围创建与竞态
/// 恢复、增量水位线、上游抓取、逐条解析与去重入库、带过滤的
/// 结果读取，以及成功抓取后的一次配额消耗。
pub struct NewsSearchService<SR, AR, QR, FC> {
    scope_repo: Arc<SR>,
    article_repo: Arc<AR>,
    quota_repo: Arc<QR>,
    feed_client: Arc<FC>,
    cache_ttl_minutes: i64,
}

impl<SR, AR, QR, FC> NewsSearchService<SR, AR, QR, FC>
where
    SR: ScopeRepository + 'static,
    AR: ArticleRepository + 'static,
    QR: QuotaRepository + 'static,
    FC: FeedClient + 'static,
{
    pub fn new(
        scope_repo: Arc<SR>,
        article_repo: Arc<AR>,
        quota_repo: Arc<QR>,
        feed_client: Arc<FC>,
        cache_ttl_minutes: i64,
    ) -> Self {
        Self {
            scope_repo,
            article_repo,
            quota_repo,
            feed_client,
            cache_ttl_minutes,
        }
    }

    /// 执行一次关键词搜索
    ///
    /// 流程（顺序即契约）：
    /// 1. 配额闸门：无剩余配额的非员工直接拒绝，不产生任何状态变化；
    /// 2. 参数校验；
    /// 3. 查找 (user, keyword) 范围；
    /// 4. 缓存路径：范围存在、未要求刷新且仍新鲜 -> 读库返回，
    ///    刷新 last_searched，不调上游、不耗配额；
    /// 5. 抓取路径：建立/刷新范围 -> 水位线 -> 上游抓取 -> 逐条解析
    ///    （坏条目跳过）-> 去重入库 -> 带过滤重读 -> 消耗一次配额。
    ///
    /// 抓取失败时范围时间戳不回滚，属接受的最终不一致。
    pub async fn search(
        &self,
        user: &AuthUser,
        dto: SearchRequestDto,
    ) -> Result<SearchOutcome, SearchServiceError> {
        // 配额检查先于参数校验，与对外契约一致
        let quota = self.quota_repo.find_by_user(user.id).await?;
        let has_remaining = quota
            .as_ref()
            .map_or(user.is_staff, |q| q.has_remaining(user.is_staff));
        if !has_remaining {
            counter!("news_search_quota_rejections_total").increment(1);
            return Err(SearchServiceError::QuotaExceeded);
        }

        dto.validate().map_err(SearchServiceError::Validation)?;
        let keyword = dto.normalized_keyword();
        let filter = dto.to_filter();
        let now = Utc::now();

        let existing = self
            .scope_repo
            .find_by_user_and_keyword(user.id, &keyword)
            .await?;

        if let Some(scope) = &existing {
            if !dto.refresh && scope.is_fresh(now, self.cache_ttl_minutes) {
                let articles = self.article_repo.list_by_scope(scope.id, &filter).await?;
                self.scope_repo.touch(scope.id, now).await?;
                counter!("news_searches_total", "source" => "cache").increment(1);
                debug!(
                    "Serving '{}' from cache ({} articles after filters)",
                    keyword,
                    articles.len()
                );
                return Ok(SearchOutcome {
                    keyword,
                    source: SearchSource::Cache,
                    articles,
                });
            }
        }

        // 抓取路径：先落范围再调上游，上游失败不回滚时间戳
        let (scope, preexisting) = match existing {
            Some(scope) => {
                self.scope_repo.touch(scope.id, now).await?;
                (scope, true)
            }
            None => {
                let candidate = SearchScope::new(user.id, keyword.clone());
                match self.scope_repo.create(&candidate).await {
                    Ok(scope) => (scope, false),
                    Err(ScopeRepositoryError::AlreadyExists) => {
                        // 创建竞态的败者改用对方刚建好的范围
                        let scope = self
                            .scope_repo
                            .find_by_user_and_keyword(user.id, &keyword)
                            .await?
                            .ok_or(ScopeRepositoryError::NotFound)?;
                        self.scope_repo.touch(scope.id, now).await?;
                        (scope, true)
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        // 水位线：刷新或范围已存在时从最新一篇之后增量抓取；
        // 空范围没有水位线，退化为全量抓取
        let since = if dto.refresh || preexisting {
            self.article_repo
                .latest_by_scope(scope.id)
                .await?
                .map(|a| a.published_at)
        } else {
            None
        };

        let raw_items = match self.feed_client.fetch(&keyword, since).await {
            Ok(items) => items,
            Err(e) => {
                counter!("news_feed_failures_total").increment(1);
                warn!("Upstream fetch for '{}' failed: {}", keyword, e);
                return Err(SearchServiceError::Upstream(e));
            }
        };

        let mut fresh = Vec::with_capacity(raw_items.len());
        for raw in &raw_items {
            match NewArticle::from_raw(scope.id, raw) {
                Ok(article) => fresh.push(article),
                Err(e) => warn!("Skipping malformed item for '{}': {}", keyword, e),
            }
        }

        let inserted = self.article_repo.bulk_insert(fresh).await?;
        debug!(
            "Merged upstream batch for '{}': {} fetched, {} inserted",
            keyword,
            raw_items.len(),
            inserted
        );

        let articles = self.article_repo.list_by_scope(scope.id, &filter).await?;

        // 与既有行为保持一致：消耗结果只记日志，抓取已完成的请求不再失败
        let consumed = self.quota_repo.try_consume(user.id, !user.is_staff).await?;
        if !consumed {
            debug!("Quota consume refused for user {} after fetch", user.id);
        }

        counter!("news_searches_total", "source" => "api").increment(1);
        Ok(SearchOutcome {
            keyword,
            source: SearchSource::Api,
            articles,
        })
    }
}

#[cfg(test)]
#[path = "search_service_test.rs"]
mod tests;
