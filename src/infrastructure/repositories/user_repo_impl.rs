// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::user::User;
use crate::domain::repositories::user_repository::{UserRepository, UserRepositoryError};
use crate::infrastructure::database::entities::{api_token, user as user_entity};

/// 用户仓库实现
///
/// 基于SeaORM实现的用户与令牌数据访问层
#[derive(Clone)]
pub struct UserRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<user_entity::Model> for User {
    fn from(model: user_entity::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            is_staff: model.is_staff,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            last_login: model.last_login.map(|t| t.with_timezone(&Utc)),
        }
    }
}

impl From<&User> for user_entity::ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            is_staff: Set(user.is_staff),
            is_active: Set(user.is_active),
            created_at: Set(user.created_at.fixed_offset()),
            last_login: Set(user.last_login.map(|t| t.fixed_offset())),
        }
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, user: &User) -> Result<User, UserRepositoryError> {
        let model: user_entity::ActiveModel = user.into();
        match model.insert(self.db.as_ref()).await {
            Ok(inserted) => Ok(inserted.into()),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(UserRepositoryError::AlreadyExists)
                }
                _ => Err(e.into()),
            },
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        let model = user_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError> {
        let model = user_entity::Entity::find()
            .filter(user_entity::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn list_non_staff(&self) -> Result<Vec<User>, UserRepositoryError> {
        let models = user_entity::Entity::find()
            .filter(user_entity::Column::IsStaff.eq(false))
            .order_by_asc(user_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_flags(
        &self,
        id: Uuid,
        is_staff: Option<bool>,
        is_active: Option<bool>,
    ) -> Result<User, UserRepositoryError> {
        let model = user_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(UserRepositoryError::NotFound)?;

        let mut active: user_entity::ActiveModel = model.into();
        if let Some(staff) = is_staff {
            active.is_staff = Set(staff);
        }
        if let Some(enabled) = is_active {
            active.is_active = Set(enabled);
        }

        let updated = active.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    async fn insert_token(&self, user_id: Uuid, token: &str) -> Result<(), UserRepositoryError> {
        let model = api_token::ActiveModel {
            token: Set(token.to_string()),
            user_id: Set(user_id),
            created_at: Set(Utc::now().fixed_offset()),
        };
        model.insert(self.db.as_ref()).await?;
        Ok(())
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), UserRepositoryError> {
        user_entity::Entity::update_many()
            .col_expr(
                user_entity::Column::LastLogin,
                Expr::value::<Option<DateTime<FixedOffset>>>(Some(at.fixed_offset())),
            )
            .filter(user_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}
