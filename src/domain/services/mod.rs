// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务，这些服务封装了复杂的
/// 业务规则和领域逻辑，协调多个领域对象来完成业务操作。
///
/// 包含的服务：
/// - 搜索服务（search_service）：关键词搜索的完整编排，包括
///   配额闸门、缓存命中判断、增量抓取与去重入库
/// - 用户服务（user_service）：注册、登录与员工侧的用户管理
///
/// 领域服务与应用程序服务的区别在于：领域服务包含纯粹的业务逻辑，
/// 而应用程序服务负责协调和编排，可能包含技术实现细节。
pub mod search_service;
pub mod user_service;
