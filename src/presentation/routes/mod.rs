// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::infrastructure::feed::NewsApiClient;
use crate::infrastructure::repositories::article_repo_impl::ArticleRepositoryImpl;
use crate::infrastructure::repositories::quota_repo_impl::QuotaRepositoryImpl;
use crate::infrastructure::repositories::scope_repo_impl::ScopeRepositoryImpl;
use crate::infrastructure::repositories::user_repo_impl::UserRepositoryImpl;
use crate::presentation::handlers::{auth_handler, keyword_handler, search_handler, user_handler};
use crate::presentation::middleware::auth_middleware::{auth_middleware, AuthState};
use axum::{
    routing::{get, patch, post},
    Extension, Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// 组装公开与受保护两组路由，注入仓库与上游客户端。
/// 受保护路由经过令牌认证中间件。
///
/// # 返回值
///
/// 返回配置好的路由
pub fn app(
    db: Arc<DatabaseConnection>,
    settings: Arc<Settings>,
    feed_client: Arc<NewsApiClient>,
) -> Router {
    let user_repo = Arc::new(UserRepositoryImpl::new(db.clone()));
    let scope_repo = Arc::new(ScopeRepositoryImpl::new(db.clone()));
    let article_repo = Arc::new(ArticleRepositoryImpl::new(db.clone()));
    let quota_repo = Arc::new(QuotaRepositoryImpl::new(db.clone()));

    let auth_state = AuthState { db: db.clone() };

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/version", get(version))
        .route(
            "/api/auth/register",
            post(auth_handler::register::<UserRepositoryImpl, QuotaRepositoryImpl>),
        )
        .route(
            "/api/auth/login",
            post(auth_handler::login::<UserRepositoryImpl, QuotaRepositoryImpl>),
        );

    let protected_routes = Router::new()
        .route(
            "/api/search/advanced",
            post(
                search_handler::advanced_search::<
                    ScopeRepositoryImpl,
                    ArticleRepositoryImpl,
                    QuotaRepositoryImpl,
                    NewsApiClient,
                >,
            ),
        )
        .route(
            "/api/user/search-history",
            get(user_handler::search_history::<ScopeRepositoryImpl>),
        )
        .route(
            "/api/user/list",
            get(user_handler::list_users::<UserRepositoryImpl, QuotaRepositoryImpl>),
        )
        .route(
            "/api/user/update",
            patch(user_handler::update_user::<UserRepositoryImpl, QuotaRepositoryImpl>),
        )
        .route(
            "/api/keywords/top",
            get(keyword_handler::top_keywords::<ScopeRepositoryImpl>),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(Extension(user_repo))
        .layer(Extension(scope_repo))
        .layer(Extension(article_repo))
        .layer(Extension(quota_repo))
        .layer(Extension(feed_client))
        .layer(Extension(settings))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
