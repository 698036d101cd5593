// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::{
    application::dto::search_request::{ArticleDto, SearchDataDto, SearchRequestDto},
    config::settings::Settings,
    domain::{
        feed::FeedClient,
        models::user::AuthUser,
        repositories::{
            article_repository::ArticleRepository, quota_repository::QuotaRepository,
            scope_repository::ScopeRepository,
        },
        services::search_service::{NewsSearchService, SearchServiceError, SearchSource},
    },
    presentation::errors::{internal_error, validation_errors},
};

/// 处理关键词搜索请求
///
/// # 参数
///
/// * `scope_repo` - 搜索范围仓库实例
/// * `article_repo` - 文章仓库实例
/// * `quota_repo` - 配额仓库实例
/// * `feed_client` - 上游新闻客户端
/// * `user` - 认证中间件注入的当前用户
/// * `payload` - 搜索请求数据
///
/// # 返回值
///
/// 返回实现了 `IntoResponse` 的响应，包含搜索结果或错误信息
///
/// # 错误
///
/// 可能在以下情况下返回错误响应：
/// - 用户配额已用尽
/// - 搜索参数校验失败
/// - 上游接口调用失败
/// - 仓库操作失败
pub async fn advanced_search<SR, AR, QR, FC>(
    Extension(scope_repo): Extension<Arc<SR>>,
    Extension(article_repo): Extension<Arc<AR>>,
    Extension(quota_repo): Extension<Arc<QR>>,
    Extension(feed_client): Extension<Arc<FC>>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SearchRequestDto>,
) -> impl IntoResponse
where
    SR: ScopeRepository + 'static,
    AR: ArticleRepository + 'static,
    QR: QuotaRepository + 'static,
    FC: FeedClient + 'static,
{
    let service = NewsSearchService::new(
        scope_repo,
        article_repo,
        quota_repo,
        feed_client,
        settings.search.cache_ttl_minutes,
    );
    match service.search(&user, payload).await {
        Ok(outcome) => {
            let message = match outcome.source {
                SearchSource::Cache => "Using cached data",
                SearchSource::Api => "Data fetched from API",
            };
            let data = SearchDataDto {
                source: outcome.source.as_str(),
                articles: outcome.articles.iter().map(ArticleDto::from).collect(),
                keyword: outcome.keyword,
            };
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": message,
                    "data": data
                })),
            )
                .into_response()
        }
        Err(SearchServiceError::QuotaExceeded) => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "success": false,
                "message": "Quota limit reached",
                "data": null
            })),
        )
            .into_response(),
        Err(SearchServiceError::Validation(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "Invalid search parameters",
                "errors": validation_errors(&errors),
                "data": null
            })),
        )
            .into_response(),
        Err(SearchServiceError::Upstream(e)) => {
            error!("Upstream news fetch failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "success": false,
                    "message": "Error fetching news from API",
                    "data": null
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Search failed: {:?}", e);
            internal_error()
        }
    }
}
