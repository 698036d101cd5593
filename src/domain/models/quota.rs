// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQuota {
    pub user_id: Uuid,
    pub quota_limit: i32,
    pub used_quota: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserQuota {
    /// 员工不受限额约束，普通用户须有未用完的配额
    pub fn has_remaining(&self, is_staff: bool) -> bool {
        is_staff || self.used_quota < self.quota_limit
    }
}
