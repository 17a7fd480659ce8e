//! 审计日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: Option<i64>,
    pub campus_id: Option<i64>,
    pub actor_id: i64,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<i64>,
    pub summary: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_audit_log(self) -> crate::models::audit::entities::AuditLog {
        crate::models::audit::entities::AuditLog {
            id: self.id,
            tenant_id: self.tenant_id,
            campus_id: self.campus_id,
            actor_id: self.actor_id,
            action: self.action,
            resource: self.resource,
            resource_id: self.resource_id,
            summary: self.summary,
            ip_address: self.ip_address,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
