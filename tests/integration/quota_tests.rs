// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 配额消耗的并发正确性，直接针对仓库实现

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use newsrs::domain::repositories::quota_repository::QuotaRepository;
use newsrs::infrastructure::database::entities::{user, user_quota};
use newsrs::infrastructure::repositories::quota_repo_impl::QuotaRepositoryImpl;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;
use uuid::Uuid;

async fn setup_db() -> Arc<DatabaseConnection> {
    // 单连接，确保所有查询命中同一个内存库
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(db)
}

async fn seed_user(db: &DatabaseConnection) -> Uuid {
    let user_id = Uuid::new_v4();
    user::ActiveModel {
        id: Set(user_id),
        username: Set(format!("user-{}", user_id.simple())),
        email: Set(None),
        password_hash: Set("irrelevant".to_string()),
        is_staff: Set(false),
        is_active: Set(true),
        created_at: Set(Utc::now().fixed_offset()),
        last_login: Set(None),
    }
    .insert(db)
    .await
    .unwrap();
    user_id
}

async fn used_quota(db: &DatabaseConnection, user_id: Uuid) -> i32 {
    user_quota::Entity::find_by_id(user_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .used_quota
}

#[tokio::test]
async fn test_concurrent_consumers_never_exceed_limit() {
    let db = setup_db().await;
    let user_id = seed_user(&db).await;
    let repo = Arc::new(QuotaRepositoryImpl::new(db.clone()));
    repo.create(user_id, 3).await.unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.try_consume(user_id, true).await.unwrap() })
        })
        .collect();

    let mut granted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            granted += 1;
        }
    }

    // 每次成功对应一次恰好加一的更新，超过限额后只能被拒绝
    assert_eq!(granted, 3);
    assert_eq!(used_quota(&db, user_id).await, 3);
}

#[tokio::test]
async fn test_unenforced_consume_counts_past_limit() {
    let db = setup_db().await;
    let user_id = seed_user(&db).await;
    let repo = QuotaRepositoryImpl::new(db.clone());
    repo.create(user_id, 2).await.unwrap();

    for _ in 0..5 {
        assert!(repo.try_consume(user_id, false).await.unwrap());
    }

    assert_eq!(used_quota(&db, user_id).await, 5);
}

#[tokio::test]
async fn test_consume_without_quota_row_is_refused() {
    let db = setup_db().await;
    let user_id = seed_user(&db).await;
    let repo = QuotaRepositoryImpl::new(db.clone());

    assert!(!repo.try_consume(user_id, false).await.unwrap());
    assert!(user_quota::Entity::find_by_id(user_id)
        .one(db.as_ref())
        .await
        .unwrap()
        .is_none());
}
