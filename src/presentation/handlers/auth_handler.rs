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
    application::dto::auth_request::{LoginRequestDto, RegisterRequestDto, UserInfoDto},
    config::settings::Settings,
    domain::{
        repositories::{quota_repository::QuotaRepository, user_repository::UserRepository},
        services::user_service::{UserService, UserServiceError},
    },
    presentation::errors::{field_error, internal_error, validation_errors},
};

/// 处理用户注册请求
///
/// 创建用户与默认配额，成功时返回用户信息和首个访问令牌
pub async fn register<UR, QR>(
    Extension(user_repo): Extension<Arc<UR>>,
    Extension(quota_repo): Extension<Arc<QR>>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<RegisterRequestDto>,
) -> impl IntoResponse
where
    UR: UserRepository + 'static,
    QR: QuotaRepository + 'static,
{
    let service = UserService::new(
        user_repo,
        quota_repo,
        settings.quota.default_limit,
        settings.auth.password_secret.clone(),
    );
    match service.register(payload).await {
        Ok((user, token)) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Registration successful",
                "data": {
                    "user": UserInfoDto::from(&user),
                    "token": token
                }
            })),
        )
            .into_response(),
        Err(UserServiceError::Validation(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "Registration failed",
                "errors": validation_errors(&errors),
                "data": null
            })),
        )
            .into_response(),
        Err(UserServiceError::UsernameTaken) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "Registration failed",
                "errors": field_error("username", "A user with that username already exists."),
                "data": null
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to register user: {:?}", e);
            internal_error()
        }
    }
}

/// 处理用户登录请求
///
/// 校验凭据并签发新的访问令牌
pub async fn login<UR, QR>(
    Extension(user_repo): Extension<Arc<UR>>,
    Extension(quota_repo): Extension<Arc<QR>>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<LoginRequestDto>,
) -> impl IntoResponse
where
    UR: UserRepository + 'static,
    QR: QuotaRepository + 'static,
{
    let service = UserService::new(
        user_repo,
        quota_repo,
        settings.quota.default_limit,
        settings.auth.password_secret.clone(),
    );
    match service.login(payload).await {
        Ok((user, token)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Login successful",
                "data": {
                    "user": UserInfoDto::from(&user),
                    "token": token
                }
            })),
        )
            .into_response(),
        Err(UserServiceError::MissingCredentials) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "Please provide both username and password",
                "data": null
            })),
        )
            .into_response(),
        Err(UserServiceError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "message": "Invalid credentials",
                "data": null
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to log user in: {:?}", e);
            internal_error()
        }
    }
}
