// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::user::User;

/// 注册请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct RegisterRequestDto {
    #[validate(length(min = 1, max = 150, message = "This field may not be blank."))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
    #[validate(must_match(other = password, message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// 登录请求
///
/// 两个字段的缺失检查由服务层手工完成，以返回固定的提示语
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequestDto {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// 响应中的用户对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfoDto {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub is_staff: bool,
}

impl From<&User> for UserInfoDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_staff: user.is_staff,
        }
    }
}
