pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_tables;
mod m20250310_000001_create_assessments;
mod m20250315_000001_create_settings_and_audit;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_tables::Migration),
            Box::new(m20250310_000001_create_assessments::Migration),
            Box::new(m20250315_000001_create_settings_and_audit::Migration),
        ]
    }
}
