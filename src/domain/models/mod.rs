// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 用户（user）：可登录并执行搜索的账号
/// - 搜索范围（search_scope）：某用户搜索过的一个关键词
/// - 文章（article）：归属于搜索范围的新闻条目
/// - 配额（quota）：用户的搜索次数限额
///
/// 这些模型构成了系统的数据基础，定义了业务概念的
/// 结构和行为，是领域驱动设计的核心组成部分。
pub mod article;
pub mod quota;
pub mod search_scope;
pub mod user;
