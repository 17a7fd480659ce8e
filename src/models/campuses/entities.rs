use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::ResourceScope;

// 校区
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campus {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub code: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i64>,
}

impl Campus {
    pub fn scope(&self) -> ResourceScope {
        ResourceScope::campus(self.tenant_id, self.id)
    }
}
