// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 新闻数据源领域模块
///
/// 定义上游新闻接口的抽象与原始数据表示
pub mod client;

pub use client::{FeedClient, FeedError, RawArticle, RawSource};
