// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 仓库接口定义了数据持久化的抽象契约，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 用户仓库（user_repository）：管理用户账号与会话令牌
/// - 搜索范围仓库（scope_repository）：管理用户的关键词范围
/// - 文章仓库（article_repository）：管理范围内的新闻文章
/// - 配额仓库（quota_repository）：管理用户的搜索配额
///
/// 这些接口确保了领域层不依赖于具体的数据存储技术，
/// 提高了系统的可测试性和可维护性.
pub mod article_repository;
pub mod quota_repository;
pub mod scope_repository;
pub mod user_repository;
