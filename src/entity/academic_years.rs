//! 学年实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "academic_years")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
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
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_academic_year(self) -> crate::models::academic_years::entities::AcademicYear {
        crate::models::academic_years::entities::AcademicYear {
            id: self.id,
            tenant_id: self.tenant_id,
            name: self.name,
            start_date: super::to_date(&self.start_date),
            end_date: super::to_date(&self.end_date),
            is_current: self.is_current,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
            created_by: self.created_by,
        }
    }
}
