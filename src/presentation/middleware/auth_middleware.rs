// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::user::AuthUser;
use crate::infrastructure::database::entities::{api_token, user};
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;

/// 认证状态
#[derive(Clone)]
pub struct AuthState {
    /// 数据库连接
    pub db: Arc<DatabaseConnection>,
}

/// 认证中间件
///
/// 验证请求中的访问令牌，并向请求注入当前用户信息
///
/// # 参数
///
/// * `state` - 认证状态
/// * `req` - HTTP请求
/// * `next` - 下一个中间件
///
/// # 返回值
///
/// * `Ok(Response)` - 认证成功的响应
/// * `Err(StatusCode)` - 认证失败的状态码
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token_str = {
        let auth_header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        if !auth_header.starts_with("Bearer ") {
            return Err(StatusCode::UNAUTHORIZED);
        }

        auth_header[7..].to_string()
    };

    // Query DB to validate the token and load its owner
    let token = match api_token::Entity::find_by_id(token_str)
        .one(state.db.as_ref())
        .await
    {
        Ok(Some(token)) => token,
        Ok(None) => {
            tracing::warn!("Rejected request with unknown access token");
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(e) => {
            tracing::error!("Database error checking access token: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match user::Entity::find_by_id(token.user_id)
        .one(state.db.as_ref())
        .await
    {
        Ok(Some(account)) if account.is_active => {
            req.extensions_mut().insert(AuthUser {
                id: account.id,
                username: account.username,
                is_staff: account.is_staff,
            });
            Ok(next.run(req).await)
        }
        Ok(Some(account)) => {
            tracing::warn!("Rejected token of deactivated user {}", account.username);
            Err(StatusCode::UNAUTHORIZED)
        }
        Ok(None) => {
            tracing::warn!("Access token references a missing user");
            Err(StatusCode::UNAUTHORIZED)
        }
        Err(e) => {
            tracing::error!("Database error loading user for token: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
#[path = "auth_middleware_test.rs"]
mod tests;
