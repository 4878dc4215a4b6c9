pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_identity_tables;
mod m20240601_000002_create_catalog_tables;
mod m20240601_000003_create_order_tables;
mod m20240601_000004_create_promotion_tables;
mod m20240601_000005_create_loyalty_tables;
mod m20240601_000006_create_content_tables;
mod m20240601_000007_seed_reference_data;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_identity_tables::Migration),
            Box::new(m20240601_000002_create_catalog_tables::Migration),
            Box::new(m20240601_000003_create_order_tables::Migration),
            Box::new(m20240601_000004_create_promotion_tables::Migration),
            Box::new(m20240601_000005_create_loyalty_tables::Migration),
            Box::new(m20240601_000006_create_content_tables::Migration),
            Box::new(m20240601_000007_seed_reference_data::Migration),
        ]
    }
}
