use serde::Deserialize;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::policy::{Resource, ScopeFilter};

#[derive(Debug, Deserialize)]
pub struct AuditLogListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub resource: Option<Resource>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub actor_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct AuditLogListQuery {
    pub page: u64,
    pub size: u64,
    pub scope: ScopeFilter,
    pub resource: Option<Resource>,
    pub actor_id: Option<i64>,
}
