// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub scope_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: DateTimeWithTimeZone,
    pub source_name: String,
    pub source_category: Option<String>,
    pub language: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::search_scope::Entity",
        from = "Column::ScopeId",
        to = "super::search_scope::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    SearchScope,
}

impl Related<super::search_scope::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SearchScope.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
