// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 新闻数据源基础设施模块
///
/// 提供领域层 FeedClient 抽象的 HTTP 实现
pub mod newsapi;

pub use newsapi::NewsApiClient;
