//! 租户（学校）实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub status: String,
    pub contact_email: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: Option<i64>,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::campuses::Entity")]
    Campuses,
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
}

impl Related<super::campuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campuses.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_tenant(self) -> crate::models::tenants::entities::Tenant {
        use crate::models::tenants::entities::{Tenant, TenantStatus};

        Tenant {
            id: self.id,
            name: self.name,
            code: self.code,
            status: self
                .status
                .parse::<TenantStatus>()
                .unwrap_or(TenantStatus::Active),
            contact_email: self.contact_email,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
            created_by: self.created_by,
        }
    }
}
