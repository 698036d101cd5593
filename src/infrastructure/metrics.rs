// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

/// 初始化指标系统
///
/// 启动 Prometheus 导出端点并注册应用指标
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let addr: SocketAddr = "0.0.0.0:9000".parse().expect("Invalid metrics address");

    // Start the exporter
    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = builder.with_http_listener(addr).install() {
        tracing::warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
    }

    // Register metrics
    describe_counter!(
        "news_searches_total",
        "Total number of completed searches, labeled by result source"
    );
    describe_counter!(
        "news_search_quota_rejections_total",
        "Total number of searches refused because the user quota was exhausted"
    );
    describe_counter!(
        "news_feed_requests_total",
        "Total number of requests sent to the upstream news feed"
    );
    describe_counter!(
        "news_feed_failures_total",
        "Total number of upstream news feed failures"
    );
    describe_histogram!(
        "news_feed_request_duration_seconds",
        "Duration of upstream news feed requests in seconds"
    );
    describe_counter!(
        "user_registrations_total",
        "Total number of registered users"
    );

    info!("Metrics exporter listening on {}", addr);
}
