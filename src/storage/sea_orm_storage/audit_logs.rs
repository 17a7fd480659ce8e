//! 审计日志存储操作

use super::{SeaOrmStorage, db_err};
use crate::entity::audit_logs::{ActiveModel, Column, Entity as AuditLogs};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse,
    audit::{
        entities::{AuditLog, NewAuditLog},
        requests::AuditLogListQuery,
    },
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_audit_log_impl(&self, log: NewAuditLog) -> Result<AuditLog> {
        let model = ActiveModel {
            tenant_id: Set(log.tenant_id),
            campus_id: Set(log.campus_id),
            actor_id: Set(log.actor_id),
            action: Set(log.action.to_string()),
            resource: Set(log.resource.to_string()),
            resource_id: Set(log.resource_id),
            summary: Set(log.summary),
            ip_address: Set(log.ip_address),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_err("Failed to write audit log"))?;

        Ok(result.into_audit_log())
    }

    pub async fn list_audit_logs_with_pagination_impl(
        &self,
        query: AuditLogListQuery,
    ) -> Result<PaginatedResponse<AuditLog>> {
        let mut select = AuditLogs::find();

        if let Some(tenant_id) = query.scope.tenant_id {
            select = select.filter(Column::TenantId.eq(tenant_id));
        }
        if let Some(campus_id) = query.scope.campus_id {
            select = select.filter(Column::CampusId.eq(campus_id));
        }
        if let Some(resource) = query.resource {
            select = select.filter(Column::Resource.eq(resource.as_str()));
        }
        if let Some(actor_id) = query.actor_id {
            select = select.filter(Column::ActorId.eq(actor_id));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let (items, pagination) = self
            .fetch_page(select, query.page, query.size, "Failed to list audit logs")
            .await?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_audit_log()).collect(),
            pagination,
        })
    }
}
