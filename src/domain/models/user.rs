// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户实体
///
/// 表示一个可以登录并执行关键词搜索的账号。
/// 员工账号（is_staff）不受搜索配额限制，并可访问管理接口。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// 用户唯一标识符
    pub id: Uuid,
    /// 登录用户名，全局唯一
    pub username: String,
    /// 邮箱，注册时可不填
    pub email: Option<String>,
    /// 加盐哈希后的密码
    pub password_hash: String,
    /// 是否为员工账号
    pub is_staff: bool,
    /// 是否启用，被禁用的账号无法通过认证
    pub is_active: bool,
    /// 注册时间
    pub created_at: DateTime<Utc>,
    /// 最近一次登录时间
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// 创建一个新的普通用户
    pub fn new(username: String, email: Option<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            is_staff: false,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }
}

/// 认证后的请求主体
///
/// 认证中间件解析令牌后注入请求扩展，处理器据此识别调用者。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub is_staff: bool,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}
