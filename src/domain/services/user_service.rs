// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::auth_request::{LoginRequestDto, RegisterRequestDto};
use crate::application::dto::user_admin::UserStatusUpdateDto;
use crate::domain::models::quota::UserQuota;
use crate::domain::models::user::User;
use crate::domain::repositories::quota_repository::{QuotaRepository, QuotaRepositoryError};
use crate::domain::repositories::user_repository::{UserRepository, UserRepositoryError};
use crate::utils::passwords;
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use validator::Validate;

/// 用户服务错误
#[derive(Error, Debug)]
pub enum UserServiceError {
    /// 请求体校验失败
    #[error("Validation failed")]
    Validation(validator::ValidationErrors),
    /// 用户名已被占用
    #[error("A user with that username already exists.")]
    UsernameTaken,
    /// 登录请求缺少用户名或密码
    #[error("Please provide both username and password")]
    MissingCredentials,
    /// 凭据错误或账号被禁用
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// 管理操作的目标用户不存在
    #[error("User not found")]
    UserNotFound,
    /// 管理操作不允许作用于员工账号
    #[error("Cannot update status for staff users")]
    StaffTarget,
    /// 用户仓库错误
    #[error("Repository error: {0}")]
    User(#[from] UserRepositoryError),
    /// 配额仓库错误
    #[error("Repository error: {0}")]
    Quota(#[from] QuotaRepositoryError),
}

/// 管理更新的结果，只回显实际改动过的字段
#[derive(Debug, Default)]
pub struct UserUpdateOutcome {
    pub is_active: Option<bool>,
    pub quota_limit: Option<i32>,
}

/// 用户服务
///
/// 注册、登录与员工侧的用户管理。密码以加盐 HMAC 形式存储，
/// 会话令牌为不透明随机串，注册与每次登录都会签发新令牌。
pub struct UserService<UR, QR> {
    user_repo: Arc<UR>,
    quota_repo: Arc<QR>,
    default_quota_limit: i32,
    password_secret: String,
}

impl<UR, QR> UserService<UR, QR>
where
    UR: UserRepository + 'static,
    QR: QuotaRepository + 'static,
{
    pub fn new(
        user_repo: Arc<UR>,
        quota_repo: Arc<QR>,
        default_quota_limit: i32,
        password_secret: String,
    ) -> Self {
        Self {
            user_repo,
            quota_repo,
            default_quota_limit,
            password_secret,
        }
    }

    /// 注册新用户
    ///
    /// 创建用户与默认配额记录，并签发首个会话令牌。
    ///
    /// # 返回值
    ///
    /// 新建的用户与其令牌
    pub async fn register(
        &self,
        dto: RegisterRequestDto,
    ) -> Result<(User, String), UserServiceError> {
        dto.validate().map_err(UserServiceError::Validation)?;

        let password_hash = passwords::hash_password(&dto.password, &self.password_secret);
        let candidate = User::new(dto.username.clone(), dto.email.clone(), password_hash);

        let user = match self.user_repo.create(&candidate).await {
            Ok(user) => user,
            Err(UserRepositoryError::AlreadyExists) => {
                return Err(UserServiceError::UsernameTaken)
            }
            Err(e) => return Err(e.into()),
        };

        self.quota_repo
            .create(user.id, self.default_quota_limit)
            .await?;

        let token = passwords::generate_token();
        self.user_repo.insert_token(user.id, &token).await?;

        counter!("user_registrations_total").increment(1);
        info!("Registered user '{}' ({})", user.username, user.id);
        Ok((user, token))
    }

    /// 用户登录
    ///
    /// 校验凭据与账号状态，记录登录时间并签发新令牌。
    /// 用户不存在、密码错误与账号被禁用对外不可区分。
    pub async fn login(&self, dto: LoginRequestDto) -> Result<(User, String), UserServiceError> {
        let username = dto.username.as_deref().filter(|s| !s.is_empty());
        let password = dto.password.as_deref().filter(|s| !s.is_empty());
        let (username, password) = match (username, password) {
            (Some(u), Some(p)) => (u, p),
            _ => return Err(UserServiceError::MissingCredentials),
        };

        let user = match self.user_repo.find_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!("Login failed for unknown username '{}'", username);
                return Err(UserServiceError::InvalidCredentials);
            }
        };

        if !passwords::verify_password(password, &self.password_secret, &user.password_hash)
            || !user.is_active
        {
            warn!("Login rejected for '{}'", username);
            return Err(UserServiceError::InvalidCredentials);
        }

        let now = Utc::now();
        self.user_repo.record_login(user.id, now).await?;
        let token = passwords::generate_token();
        self.user_repo.insert_token(user.id, &token).await?;

        let user = User {
            last_login: Some(now),
            ..user
        };
        Ok((user, token))
    }

    /// 列出全部非员工用户及其配额
    ///
    /// 没有配额记录的用户配额位为 None
    pub async fn list_users(&self) -> Result<Vec<(User, Option<UserQuota>)>, UserServiceError> {
        let users = self.user_repo.list_non_staff().await?;
        let mut rows = Vec::with_capacity(users.len());
        for user in users {
            let quota = self.quota_repo.find_by_user(user.id).await?;
            rows.push((user, quota));
        }
        Ok(rows)
    }

    /// 更新用户状态与配额限制
    ///
    /// 两个字段相互独立，可以只改其一。员工账号不可作为目标；
    /// 配额更新在记录缺失时先补建。
    pub async fn update_user(
        &self,
        dto: UserStatusUpdateDto,
    ) -> Result<UserUpdateOutcome, UserServiceError> {
        dto.validate().map_err(UserServiceError::Validation)?;
        // validate() 保证 user_id 一定存在
        let user_id = dto.user_id.ok_or(UserServiceError::UserNotFound)?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(UserServiceError::UserNotFound)?;
        if user.is_staff {
            return Err(UserServiceError::StaffTarget);
        }

        let mut outcome = UserUpdateOutcome::default();

        if let Some(is_active) = dto.is_active {
            self.user_repo
                .update_flags(user_id, None, Some(is_active))
                .await?;
            outcome.is_active = Some(is_active);
        }

        if let Some(limit) = dto.user_quota {
            self.quota_repo.set_limit(user_id, limit).await?;
            outcome.quota_limit = Some(limit);
        }

        info!(
            "User {} updated (is_active: {:?}, quota_limit: {:?})",
            user_id, outcome.is_active, outcome.quota_limit
        );
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "user_service_test.rs"]
mod tests;
