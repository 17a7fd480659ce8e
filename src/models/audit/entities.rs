use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::Resource;

/// 审计动作
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Create => write!(f, "create"),
            AuditAction::Update => write!(f, "update"),
            AuditAction::Delete => write!(f, "delete"),
        }
    }
}

// 审计日志
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: i64,
    pub tenant_id: Option<i64>,
    pub campus_id: Option<i64>,
    pub actor_id: i64,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<i64>,
    pub summary: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 待写入的审计记录
#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub tenant_id: Option<i64>,
    pub campus_id: Option<i64>,
    pub actor_id: i64,
    pub action: AuditAction,
    pub resource: Resource,
    pub resource_id: Option<i64>,
    pub summary: Option<String>,
    pub ip_address: Option<String>,
}
