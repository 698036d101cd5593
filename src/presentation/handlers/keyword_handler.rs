// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::{
    domain::{models::user::AuthUser, repositories::scope_repository::ScopeRepository},
    presentation::errors::{internal_error, staff_only},
};

/// 返回的热门关键词条数
const TOP_KEYWORD_LIMIT: u64 = 5;

/// 统计全系统最热门的搜索关键词，仅员工可用
pub async fn top_keywords<SR>(
    Extension(scope_repo): Extension<Arc<SR>>,
    Extension(user): Extension<AuthUser>,
) -> impl IntoResponse
where
    SR: ScopeRepository + 'static,
{
    if !user.is_staff {
        return staff_only();
    }

    match scope_repo.top_keywords(TOP_KEYWORD_LIMIT).await {
        Ok(keywords) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Top keywords retrieved successfully",
                "data": { "top_keywords": keywords }
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to compute top keywords: {:?}", e);
            internal_error()
        }
    }
}
