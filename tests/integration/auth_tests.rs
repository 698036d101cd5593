// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, TEST_PASSWORD};
use axum::http::StatusCode;
use newsrs::infrastructure::database::entities::{api_token, user, user_quota};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;

/// 测试注册成功
///
/// 验证注册接口创建用户、默认配额记录与首个访问令牌
#[tokio::test]
async fn test_register_creates_user_quota_and_token() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": TEST_PASSWORD,
            "confirm_password": TEST_PASSWORD
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Registration successful"));
    assert_eq!(body["data"]["user"]["username"], json!("alice"));
    assert_eq!(body["data"]["user"]["email"], json!("alice@example.com"));
    assert_eq!(body["data"]["user"]["is_staff"], json!(false));

    let user_id =
        uuid::Uuid::parse_str(body["data"]["user"]["id"].as_str().unwrap()).unwrap();
    let token = body["data"]["token"].as_str().unwrap();

    let account = user::Entity::find_by_id(user_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert!(account.is_active);
    assert!(!account.is_staff);
    // 明文密码绝不落库
    assert_ne!(account.password_hash, TEST_PASSWORD);

    let quota = user_quota::Entity::find_by_id(user_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(quota.quota_limit, 10);
    assert_eq!(quota.used_quota, 0);

    let stored_token = api_token::Entity::find_by_id(token.to_string())
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_token.user_id, user_id);
}

/// 测试重复用户名注册
///
/// 验证同名注册返回字段级错误而不是覆盖已有账号
#[tokio::test]
async fn test_register_duplicate_username_rejected() {
    let app = create_test_app().await;
    app.register_user("bob").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "bob",
            "password": TEST_PASSWORD,
            "confirm_password": TEST_PASSWORD
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Registration failed"));
    assert_eq!(
        body["errors"]["username"][0],
        json!("A user with that username already exists.")
    );

    let accounts = user::Entity::find().all(app.db.as_ref()).await.unwrap();
    assert_eq!(accounts.len(), 1);
}

/// 测试两次密码不一致
#[tokio::test]
async fn test_register_password_mismatch_rejected() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "carol",
            "password": TEST_PASSWORD,
            "confirm_password": "something-else"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], json!("Registration failed"));
    assert_eq!(
        body["errors"]["confirm_password"][0],
        json!("Passwords do not match")
    );
}

/// 测试空用户名注册
#[tokio::test]
async fn test_register_blank_username_rejected() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "username": "",
            "password": TEST_PASSWORD,
            "confirm_password": TEST_PASSWORD
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["errors"]["username"][0],
        json!("This field may not be blank.")
    );
}

/// 测试登录成功
///
/// 验证登录签发新令牌、记录登录时间，且新令牌立即可用
#[tokio::test]
async fn test_login_issues_fresh_token_and_records_login() {
    let app = create_test_app().await;
    let (user_id, register_token) = app.register_user("carol").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "carol", "password": TEST_PASSWORD }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Login successful"));
    assert_eq!(body["data"]["user"]["username"], json!("carol"));

    let login_token = body["data"]["token"].as_str().unwrap().to_string();
    assert_ne!(login_token, register_token);

    let account = user::Entity::find_by_id(user_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert!(account.last_login.is_some());

    let history = app
        .server
        .get("/api/user/search-history")
        .add_header("Authorization", format!("Bearer {}", login_token))
        .await;
    assert_eq!(history.status_code(), StatusCode::OK);
}

/// 测试密码错误登录
#[tokio::test]
async fn test_login_wrong_password_rejected() {
    let app = create_test_app().await;
    app.register_user("dave").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "dave", "password": "wrong-password" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], json!("Invalid credentials"));
}

/// 测试未知用户名登录
///
/// 响应与密码错误完全一致，不泄露用户名是否存在
#[tokio::test]
async fn test_login_unknown_username_rejected() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "nobody", "password": TEST_PASSWORD }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], json!("Invalid credentials"));
}

/// 测试缺少凭据登录
#[tokio::test]
async fn test_login_missing_password_rejected() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "dave" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["message"],
        json!("Please provide both username and password")
    );
}

/// 测试被禁用账号登录
#[tokio::test]
async fn test_login_deactivated_user_rejected() {
    let app = create_test_app().await;
    let (user_id, _) = app.register_user("erin").await;

    let mut account: user::ActiveModel = user::Entity::find_by_id(user_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap()
        .into();
    account.is_active = Set(false);
    account.update(app.db.as_ref()).await.unwrap();

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "erin", "password": TEST_PASSWORD }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], json!("Invalid credentials"));
}

/// 测试伪造令牌访问
#[tokio::test]
async fn test_unknown_bearer_token_rejected() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/api/user/search-history")
        .add_header("Authorization", "Bearer deadbeefdeadbeef")
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
