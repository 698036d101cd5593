// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::models::article::Article;
use crate::domain::repositories::article_repository::ArticleFilter;

/// 关键词搜索请求
///
/// keyword 必填；日期过滤使用 YYYY-MM-DD 格式字符串，
/// 在校验阶段解析失败会作为字段错误返回。
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SearchRequestDto {
    #[serde(default)]
    #[validate(
        length(max = 255, message = "Ensure this field has no more than 255 characters."),
        custom(function = validate_not_blank)
    )]
    pub keyword: String,
    pub source_name: Option<String>,
    pub language: Option<String>,
    #[validate(custom(function = validate_date_format))]
    pub start_date: Option<String>,
    #[validate(custom(function = validate_date_format))]
    pub end_date: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

impl SearchRequestDto {
    /// 去除关键词两端空白后的形式，范围查找与入库都用它
    pub fn normalized_keyword(&self) -> String {
        self.keyword.trim().to_string()
    }

    /// 转换为文章查询过滤条件
    ///
    /// 须在 validate() 通过后调用，此时日期一定可解析
    pub fn to_filter(&self) -> ArticleFilter {
        ArticleFilter {
            source_name: self.source_name.clone().filter(|s| !s.is_empty()),
            language: self.language.clone().filter(|s| !s.is_empty()),
            published_after: self.start_date.as_deref().and_then(parse_date),
            published_before: self.end_date.as_deref().and_then(parse_date),
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field may not be blank.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_date_format(value: &str) -> Result<(), ValidationError> {
    if parse_date(value).is_none() {
        let mut err = ValidationError::new("invalid_date");
        err.message =
            Some("Date has wrong format. Use one of these formats instead: YYYY-MM-DD.".into());
        return Err(err);
    }
    Ok(())
}

/// 响应中的文章对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source_name: String,
    pub source_category: Option<String>,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Article> for ArticleDto {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            description: article.description.clone(),
            url: article.url.clone(),
            image_url: article.image_url.clone(),
            published_at: article.published_at,
            source_name: article.source_name.clone(),
            source_category: article.source_category.clone(),
            language: article.language.clone(),
            created_at: article.created_at,
        }
    }
}

/// 搜索响应负载，source 标明数据来自缓存还是上游
#[derive(Debug, Serialize)]
pub struct SearchDataDto {
    pub keyword: String,
    pub source: &'static str,
    pub articles: Vec<ArticleDto>,
}
