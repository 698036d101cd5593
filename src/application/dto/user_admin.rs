// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::quota::UserQuota;
use crate::domain::models::search_scope::SearchScope;
use crate::domain::models::user::User;

/// 管理员更新用户请求
///
/// is_active 与 user_quota 相互独立，任一为 Some 时才更新对应字段
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct UserStatusUpdateDto {
    #[validate(required(message = "This field is required."))]
    pub user_id: Option<Uuid>,
    pub is_active: Option<bool>,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub user_quota: Option<i32>,
}

/// 用户列表项，带配额信息
#[derive(Debug, Serialize)]
pub struct UserListItemDto {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub quota: Option<QuotaInfoDto>,
}

/// 配额信息
#[derive(Debug, Serialize)]
pub struct QuotaInfoDto {
    pub quota_limit: i32,
    pub used_quota: i32,
}

impl UserListItemDto {
    pub fn from_parts(user: &User, quota: Option<&UserQuota>) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            last_login: user.last_login,
            is_active: user.is_active,
            quota: quota.map(|q| QuotaInfoDto {
                quota_limit: q.quota_limit,
                used_quota: q.used_quota,
            }),
        }
    }
}

/// 搜索历史项
#[derive(Debug, Serialize)]
pub struct SearchHistoryItemDto {
    pub keyword: String,
    pub last_searched: DateTime<Utc>,
}

impl From<&SearchScope> for SearchHistoryItemDto {
    fn from(scope: &SearchScope) -> Self {
        Self {
            keyword: scope.keyword.clone(),
            last_searched: scope.last_searched_at,
        }
    }
}
