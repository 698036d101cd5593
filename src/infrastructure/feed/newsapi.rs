// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::NewsApiSettings;
use crate::domain::feed::{FeedClient, FeedError, RawArticle};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// NewsAPI 风格接口的响应体
///
/// 只取 articles 字段，其余（status、totalResults）不参与后续流程。
/// articles 缺失按空列表处理，避免上游字段变化直接打挂解析。
#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

/// NewsAPI 客户端
///
/// 调用 /v2/everything 端点按关键词拉取新闻，复用同一个
/// HTTP 连接池，超时在每次请求上单独设置。
pub struct NewsApiClient {
    client: Client,
    base_url: Url,
    api_key: String,
    timeout: Duration,
}

impl NewsApiClient {
    /// 根据配置构建客户端
    pub fn new(settings: &NewsApiSettings) -> Result<Self, FeedError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("Newsrs-Feed/0.1.0"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FeedError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| FeedError::Network(format!("Invalid base URL: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key: settings.api_key.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }

    fn build_url(&self, keyword: &str, since: Option<DateTime<Utc>>) -> Result<Url, FeedError> {
        let mut url = self
            .base_url
            .join("/v2/everything")
            .map_err(|e| FeedError::Network(format!("Invalid request URL: {}", e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", keyword)
                .append_pair("apiKey", &self.api_key)
                .append_pair("sortBy", "publishedAt");
            if let Some(watermark) = since {
                pairs.append_pair(
                    "from",
                    &watermark.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                );
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl FeedClient for NewsApiClient {
    async fn fetch(
        &self,
        keyword: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RawArticle>, FeedError> {
        let url = self.build_url(keyword, since)?;

        counter!("news_feed_requests_total").increment(1);
        let start = std::time::Instant::now();

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        histogram!("news_feed_request_duration_seconds").record(start.elapsed().as_secs_f64());

        let status = response.status();
        if !status.is_success() {
            warn!(
                "News feed returned status {} for keyword '{}'",
                status, keyword
            );
            return Err(FeedError::UpstreamStatus(status.as_u16()));
        }

        let body: NewsApiResponse = response
            .json()
            .await
            .map_err(|e| FeedError::Malformed(e.to_string()))?;

        debug!(
            "Fetched {} raw items for keyword '{}'",
            body.articles.len(),
            keyword
        );

        Ok(body.articles)
    }
}
