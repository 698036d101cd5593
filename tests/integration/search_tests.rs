// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, feed_article, feed_body, TestApp};
use axum::http::StatusCode;
use newsrs::infrastructure::database::entities::{article, search_scope, user_quota};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn used_quota(app: &TestApp, user_id: Uuid) -> i32 {
    user_quota::Entity::find_by_id(user_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap()
        .used_quota
}

/// 测试首次搜索走上游
///
/// 验证新关键词触发上游抓取、建立搜索范围、入库并消耗一次配额
#[tokio::test]
async fn test_first_search_fetches_from_upstream() {
    let app = create_test_app().await;
    let (user_id, token) = app.register_user("alice").await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "rust"))
        .and(query_param("apiKey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body(&[
            feed_article("Rust 1.80 released", "2025-07-01T08:00:00Z"),
            feed_article("Borrow checker explained", "2025-07-01T12:00:00Z"),
        ])))
        .expect(1)
        .mount(&app.feed)
        .await;

    let response = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Data fetched from API"));
    assert_eq!(body["data"]["source"], json!("api"));
    assert_eq!(body["data"]["keyword"], json!("rust"));

    let articles = body["data"]["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 2);
    // 响应按发布时间倒序
    assert_eq!(articles[0]["title"], json!("Borrow checker explained"));
    assert_eq!(articles[1]["title"], json!("Rust 1.80 released"));
    assert_eq!(articles[0]["source_name"], json!("BBC News"));

    assert_eq!(used_quota(&app, user_id).await, 1);

    let scopes = search_scope::Entity::find()
        .filter(search_scope::Column::UserId.eq(user_id))
        .all(app.db.as_ref())
        .await
        .unwrap();
    assert_eq!(scopes.len(), 1);
    assert_eq!(scopes[0].keyword, "rust");
}

/// 测试新鲜窗口内的重复搜索
///
/// 验证窗口内的同关键词搜索直接读库，不调上游也不消耗配额
#[tokio::test]
async fn test_repeat_search_served_from_cache() {
    let app = create_test_app().await;
    let (user_id, token) = app.register_user("alice").await;

    // expect(1) 同时证明第二次没有打到上游
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body(&[
            feed_article("Rust 1.80 released", "2025-07-01T08:00:00Z"),
        ])))
        .expect(1)
        .mount(&app.feed)
        .await;

    let first = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust" }))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let second = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust" }))
        .await;

    assert_eq!(second.status_code(), StatusCode::OK);
    let body: serde_json::Value = second.json();
    assert_eq!(body["message"], json!("Using cached data"));
    assert_eq!(body["data"]["source"], json!("cache"));
    assert_eq!(body["data"]["articles"].as_array().unwrap().len(), 1);

    assert_eq!(used_quota(&app, user_id).await, 1);
}

/// 测试强制刷新的增量抓取
///
/// 验证 refresh 以最新一篇的发布时间为水位线请求上游，
/// 返回批次里的重复条目不会二次入库
#[tokio::test]
async fn test_refresh_uses_watermark_and_skips_duplicates() {
    let app = create_test_app().await;
    let (user_id, token) = app.register_user("alice").await;

    // 第一轮：空范围的全量抓取
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body(&[
            feed_article("Old story", "2025-07-01T10:00:00Z"),
            feed_article("Latest story", "2025-07-01T12:00:00Z"),
        ])))
        .up_to_n_times(1)
        .mount(&app.feed)
        .await;

    // 第二轮：必须带上水位线，返回一条重复一条新
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "rust"))
        .and(query_param("from", "2025-07-01T12:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body(&[
            feed_article("Latest story", "2025-07-01T12:00:00Z"),
            feed_article("Breaking update", "2025-07-01T13:00:00Z"),
        ])))
        .expect(1)
        .mount(&app.feed)
        .await;

    let first = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust" }))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let second = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust", "refresh": true }))
        .await;

    assert_eq!(second.status_code(), StatusCode::OK);
    let body: serde_json::Value = second.json();
    assert_eq!(body["data"]["source"], json!("api"));
    assert_eq!(body["data"]["articles"].as_array().unwrap().len(), 3);

    let stored = article::Entity::find().count(app.db.as_ref()).await.unwrap();
    assert_eq!(stored, 3);
    assert_eq!(used_quota(&app, user_id).await, 2);
}

/// 测试配额耗尽
///
/// 验证配额用完后搜索被拒，且根本不会触碰上游
#[tokio::test]
async fn test_quota_exhausted_rejected_before_upstream() {
    let app = create_test_app().await;
    let (user_id, token) = app.register_user("alice").await;

    let mut quota: user_quota::ActiveModel = user_quota::Entity::find_by_id(user_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap()
        .into();
    quota.used_quota = Set(10);
    quota.update(app.db.as_ref()).await.unwrap();

    let response = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Quota limit reached"));

    assert!(app.feed.received_requests().await.unwrap().is_empty());
    assert_eq!(used_quota(&app, user_id).await, 10);
}

/// 测试配额闸门先于参数校验
///
/// 配额耗尽时即使载荷无效也返回403而不是400
#[tokio::test]
async fn test_quota_gate_runs_before_validation() {
    let app = create_test_app().await;
    let (user_id, token) = app.register_user("alice").await;

    let mut quota: user_quota::ActiveModel = user_quota::Entity::find_by_id(user_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap()
        .into();
    quota.used_quota = Set(10);
    quota.update(app.db.as_ref()).await.unwrap();

    let response = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

/// 测试员工搜索不受配额限制
///
/// 员工账号没有配额记录，搜索照常放行
#[tokio::test]
async fn test_staff_search_bypasses_quota() {
    let app = create_test_app().await;
    let (staff_id, token) = app.seed_staff("admin").await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body(&[
            feed_article("Rust 1.80 released", "2025-07-01T08:00:00Z"),
        ])))
        .expect(1)
        .mount(&app.feed)
        .await;

    let response = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["source"], json!("api"));

    let quota = user_quota::Entity::find_by_id(staff_id)
        .one(app.db.as_ref())
        .await
        .unwrap();
    assert!(quota.is_none());
}

/// 测试批次内重复条目只入库一次
#[tokio::test]
async fn test_duplicate_items_in_batch_stored_once() {
    let app = create_test_app().await;
    let (_, token) = app.register_user("alice").await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body(&[
            feed_article("Same story", "2025-07-01T08:00:00Z"),
            feed_article("Same story", "2025-07-01T08:00:00Z"),
        ])))
        .mount(&app.feed)
        .await;

    let response = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["articles"].as_array().unwrap().len(), 1);

    let stored = article::Entity::find().count(app.db.as_ref()).await.unwrap();
    assert_eq!(stored, 1);
}

/// 测试坏条目被跳过
///
/// 缺标题或发布时间不可解析的条目不入库，其余正常
#[tokio::test]
async fn test_malformed_items_skipped() {
    let app = create_test_app().await;
    let (_, token) = app.register_user("alice").await;

    let missing_title = json!({
        "source": { "name": "BBC News" },
        "description": "No title on this one",
        "url": "https://news.example.com/broken",
        "publishedAt": "2025-07-01T09:00:00Z"
    });
    let bad_timestamp = json!({
        "source": { "name": "BBC News" },
        "title": "Bad timestamp",
        "description": "publishedAt is not RFC 3339",
        "url": "https://news.example.com/bad-date",
        "publishedAt": "yesterday"
    });

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body(&[
            missing_title,
            feed_article("Good story", "2025-07-01T10:00:00Z"),
            bad_timestamp,
        ])))
        .mount(&app.feed)
        .await;

    let response = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    let articles = body["data"]["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0]["title"], json!("Good story"));
}

/// 测试过滤条件作用于缓存结果
///
/// 来源与日期过滤只影响返回集，不触发新的抓取
#[tokio::test]
async fn test_cached_results_respect_filters() {
    let app = create_test_app().await;
    let (user_id, token) = app.register_user("alice").await;

    let reuters = json!({
        "source": { "name": "Reuters" },
        "title": "Markets rally",
        "description": "Coverage of Markets rally",
        "url": "https://news.example.com/markets-rally",
        "urlToImage": "https://news.example.com/cover.jpg",
        "publishedAt": "2025-07-03T09:00:00Z"
    });

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body(&[
            feed_article("Rust ships update", "2025-07-01T09:00:00Z"),
            reuters,
        ])))
        .expect(1)
        .mount(&app.feed)
        .await;

    let first = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust" }))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let by_source = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust", "source_name": "Reuters" }))
        .await;
    assert_eq!(by_source.status_code(), StatusCode::OK);
    let body: serde_json::Value = by_source.json();
    assert_eq!(body["data"]["source"], json!("cache"));
    let articles = body["data"]["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0]["title"], json!("Markets rally"));

    let by_start = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust", "start_date": "2025-07-02" }))
        .await;
    let body: serde_json::Value = by_start.json();
    let articles = body["data"]["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0]["title"], json!("Markets rally"));

    let by_end = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust", "end_date": "2025-07-01" }))
        .await;
    let body: serde_json::Value = by_end.json();
    let articles = body["data"]["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0]["title"], json!("Rust ships update"));

    // 三次过滤查询都走缓存，配额只在首轮抓取时扣过一次
    assert_eq!(used_quota(&app, user_id).await, 1);
}

/// 测试日期格式错误
#[tokio::test]
async fn test_invalid_date_format_rejected() {
    let app = create_test_app().await;
    let (user_id, token) = app.register_user("alice").await;

    let response = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust", "start_date": "07/01/2025" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], json!("Invalid search parameters"));
    assert_eq!(
        body["errors"]["start_date"][0],
        json!("Date has wrong format. Use one of these formats instead: YYYY-MM-DD.")
    );

    assert_eq!(used_quota(&app, user_id).await, 0);
}

/// 测试空关键词
#[tokio::test]
async fn test_blank_keyword_rejected() {
    let app = create_test_app().await;
    let (_, token) = app.register_user("alice").await;

    let response = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "   " }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["errors"]["keyword"][0],
        json!("This field may not be blank.")
    );
}

/// 测试上游故障
///
/// 上游报错映射为502，配额不消耗，但已建立的范围保留
#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let app = create_test_app().await;
    let (user_id, token) = app.register_user("alice").await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&app.feed)
        .await;

    let response = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Error fetching news from API"));

    assert_eq!(used_quota(&app, user_id).await, 0);

    let scopes = search_scope::Entity::find().count(app.db.as_ref()).await.unwrap();
    assert_eq!(scopes, 1);
}

/// 测试范围按用户隔离
///
/// 同一关键词在不同用户间互不共享缓存
#[tokio::test]
async fn test_same_keyword_isolated_between_users() {
    let app = create_test_app().await;
    let (_, token_a) = app.register_user("alice").await;
    let (_, token_b) = app.register_user("bob").await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body(&[
            feed_article("Rust 1.80 released", "2025-07-01T08:00:00Z"),
        ])))
        .expect(2)
        .mount(&app.feed)
        .await;

    let first = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token_a))
        .json(&json!({ "keyword": "rust" }))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let second = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token_b))
        .json(&json!({ "keyword": "rust" }))
        .await;
    assert_eq!(second.status_code(), StatusCode::OK);
    let body: serde_json::Value = second.json();
    // B 吃不到 A 的缓存
    assert_eq!(body["data"]["source"], json!("api"));

    let scopes = search_scope::Entity::find()
        .filter(search_scope::Column::Keyword.eq("rust"))
        .count(app.db.as_ref())
        .await
        .unwrap();
    assert_eq!(scopes, 2);
}

/// 测试关键词首尾空白归一化
#[tokio::test]
async fn test_keyword_trimmed_before_matching() {
    let app = create_test_app().await;
    let (_, token) = app.register_user("alice").await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body(&[
            feed_article("Rust 1.80 released", "2025-07-01T08:00:00Z"),
        ])))
        .expect(1)
        .mount(&app.feed)
        .await;

    let first = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "  rust  " }))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);
    let body: serde_json::Value = first.json();
    assert_eq!(body["data"]["keyword"], json!("rust"));

    let second = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust" }))
        .await;
    let body: serde_json::Value = second.json();
    assert_eq!(body["data"]["source"], json!("cache"));
}

/// 测试搜索历史
///
/// 验证历史按最近搜索时间倒序列出用户自己的关键词
#[tokio::test]
async fn test_search_history_lists_scopes_newest_first() {
    let app = create_test_app().await;
    let (_, token) = app.register_user("alice").await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body(&[])))
        .expect(2)
        .mount(&app.feed)
        .await;

    let first = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "rust" }))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let second = app
        .server
        .post("/api/search/advanced")
        .add_header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "keyword": "golang" }))
        .await;
    assert_eq!(second.status_code(), StatusCode::OK);

    let response = app
        .server
        .get("/api/user/search-history")
        .add_header("Authorization", format!("Bearer {}", token))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["message"],
        json!("Search history retrieved successfully")
    );
    let history = body["data"]["search_history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["keyword"], json!("golang"));
    assert_eq!(history[1]["keyword"], json!("rust"));
    assert!(history[0]["last_searched"].is_string());
}
