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
    application::dto::user_admin::{SearchHistoryItemDto, UserListItemDto, UserStatusUpdateDto},
    config::settings::Settings,
    domain::{
        models::user::AuthUser,
        repositories::{
            quota_repository::QuotaRepository, scope_repository::ScopeRepository,
            user_repository::UserRepository,
        },
        services::user_service::{UserService, UserServiceError},
    },
    presentation::errors::{field_error, internal_error, staff_only, validation_errors},
};

/// 返回当前用户的搜索历史，按最近搜索时间倒序
pub async fn search_history<SR>(
    Extension(scope_repo): Extension<Arc<SR>>,
    Extension(user): Extension<AuthUser>,
) -> impl IntoResponse
where
    SR: ScopeRepository + 'static,
{
    match scope_repo.list_by_user(user.id).await {
        Ok(scopes) => {
            let history: Vec<SearchHistoryItemDto> =
                scopes.iter().map(SearchHistoryItemDto::from).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Search history retrieved successfully",
                    "data": { "search_history": history }
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to load search history: {:?}", e);
            internal_error()
        }
    }
}

/// 列出全部非员工用户及其配额信息，仅员工可用
pub async fn list_users<UR, QR>(
    Extension(user_repo): Extension<Arc<UR>>,
    Extension(quota_repo): Extension<Arc<QR>>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(user): Extension<AuthUser>,
) -> impl IntoResponse
where
    UR: UserRepository + 'static,
    QR: QuotaRepository + 'static,
{
    if !user.is_staff {
        return staff_only();
    }

    let service = UserService::new(
        user_repo,
        quota_repo,
        settings.quota.default_limit,
        settings.auth.password_secret.clone(),
    );
    match service.list_users().await {
        Ok(pairs) => {
            let users: Vec<UserListItemDto> = pairs
                .iter()
                .map(|(account, quota)| UserListItemDto::from_parts(account, quota.as_ref()))
                .collect();
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Users retrieved successfully",
                    "data": { "users": users }
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to list users: {:?}", e);
            internal_error()
        }
    }
}

/// 更新用户的激活状态与配额上限，仅员工可用
///
/// 响应的 data 只回显实际改动过的字段
pub async fn update_user<UR, QR>(
    Extension(user_repo): Extension<Arc<UR>>,
    Extension(quota_repo): Extension<Arc<QR>>,
    Extension(settings): Extension<Arc<Settings>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UserStatusUpdateDto>,
) -> impl IntoResponse
where
    UR: UserRepository + 'static,
    QR: QuotaRepository + 'static,
{
    if !user.is_staff {
        return staff_only();
    }

    let service = UserService::new(
        user_repo,
        quota_repo,
        settings.quota.default_limit,
        settings.auth.password_secret.clone(),
    );
    match service.update_user(payload).await {
        Ok(outcome) => {
            let mut data = serde_json::Map::new();
            if let Some(is_active) = outcome.is_active {
                data.insert("is_active".to_string(), json!(is_active));
            }
            if let Some(quota_limit) = outcome.quota_limit {
                data.insert("quota_limit".to_string(), json!(quota_limit));
            }
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "User updated successfully",
                    "data": data
                })),
            )
                .into_response()
        }
        Err(UserServiceError::Validation(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "Invalid data",
                "errors": validation_errors(&errors),
                "data": null
            })),
        )
            .into_response(),
        Err(UserServiceError::StaffTarget) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "Invalid data",
                "errors": field_error("user_id", "Cannot update status for staff users"),
                "data": null
            })),
        )
            .into_response(),
        Err(UserServiceError::UserNotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "message": "User not found",
                "data": null
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to update user: {:?}", e);
            internal_error()
        }
    }
}
