//! 校区实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "campuses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub code: String,
    pub address: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub created_by: Option<i64>,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id"
    )]
    Tenant,
    #[sea_orm(has_many = "super::classes::Entity")]
    Classes,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_campus(self) -> crate::models::campuses::entities::Campus {
        crate::models::campuses::entities::Campus {
            id: self.id,
            tenant_id: self.tenant_id,
            name: self.name,
            code: self.code,
            address: self.address,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
            created_by: self.created_by,
        }
    }
}
