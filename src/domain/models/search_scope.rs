// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 搜索范围实体
///
/// 表示某个用户搜索过的一个关键词，是文章缓存的隔离单元：
/// 同一关键词在不同用户下对应不同的范围，互不共享结果。
/// `last_searched_at` 记录最近一次上游抓取的时间，用于判断
/// 缓存是否仍在新鲜度窗口内。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchScope {
    /// 范围唯一标识符
    pub id: Uuid,
    /// 所属用户ID
    pub user_id: Uuid,
    /// 搜索关键词，保留调用方的原始大小写
    pub keyword: String,
    /// 最近一次访问（缓存命中或上游抓取）的时间戳
    pub last_searched_at: DateTime<Utc>,
    /// 是否启用
    pub is_active: bool,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl SearchScope {
    /// 创建一个新的搜索范围
    ///
    /// `last_searched_at` 初始化为当前时间，新范围在创建后
    /// 立即处于新鲜度窗口内。
    pub fn new(user_id: Uuid, keyword: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            keyword,
            last_searched_at: now,
            is_active: true,
            created_at: now,
        }
    }

    /// 判断缓存是否仍然新鲜
    ///
    /// # 参数
    ///
    /// * `now` - 当前时间
    /// * `ttl_minutes` - 新鲜度窗口长度（分钟）
    ///
    /// # 返回值
    ///
    /// 距上次抓取不足窗口长度时返回true，此时应直接读库而非请求上游
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl_minutes: i64) -> bool {
        now - self.last_searched_at < Duration::minutes(ttl_minutes)
    }
}
