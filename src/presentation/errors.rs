// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use validator::ValidationErrors;

/// 把校验错误渲染为 字段 -> 提示语列表 的JSON映射
///
/// 无自定义提示语的规则退回使用规则代码，保证每个字段
/// 至少有一条可读信息。
pub fn validation_errors(errors: &ValidationErrors) -> Value {
    let mut map = serde_json::Map::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<Value> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| Value::String(m.to_string()))
                    .unwrap_or_else(|| Value::String(e.code.to_string()))
            })
            .collect();
        map.insert(field.to_string(), Value::Array(messages));
    }
    Value::Object(map)
}

/// 单字段错误，形如 {"field": ["message"]}
pub fn field_error(field: &str, message: &str) -> Value {
    let mut map = serde_json::Map::new();
    map.insert(field.to_string(), json!([message]));
    Value::Object(map)
}

/// 员工专属端点对普通用户的统一拒绝响应
pub fn staff_only() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "success": false,
            "message": "Only staff users can access this endpoint",
            "data": null
        })),
    )
        .into_response()
}

/// 未预期错误的统一500响应，细节只进日志不出接口
pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "message": "Internal server error",
            "data": null
        })),
    )
        .into_response()
}
