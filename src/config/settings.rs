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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器、上游新闻接口、搜索缓存、配额和认证等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 上游新闻接口配置
    pub news_api: NewsApiSettings,
    /// 搜索缓存配置
    pub search: SearchSettings,
    /// 用户配额配置
    pub quota: QuotaSettings,
    /// 认证配置
    pub auth: AuthSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 上游新闻接口配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct NewsApiSettings {
    /// 接口基础URL
    pub base_url: String,
    /// 接口密钥
    pub api_key: String,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
}

/// 搜索缓存配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// 缓存新鲜度窗口（分钟），窗口内的重复搜索直接读库
    pub cache_ttl_minutes: i64,
}

/// 用户配额配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct QuotaSettings {
    /// 新用户的默认搜索配额
    pub default_limit: i32,
}

/// 认证配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// 密码哈希密钥
    pub password_secret: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default upstream news API settings
            .set_default("news_api.base_url", "https://newsapi.org")?
            .set_default("news_api.timeout_secs", 10)?
            // Default search cache settings
            .set_default("search.cache_ttl_minutes", 15)?
            // Default quota settings
            .set_default("quota.default_limit", 10)?
            // Default auth settings
            .set_default("auth.password_secret", "your-secret-key")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("NEWSRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
