pub use sea_orm_migration::prelude::*;

mod m20250801_000001_create_profiles_table;
mod m20250801_000002_create_requests_table;
mod m20250801_000003_create_quotes_table;
mod m20250801_000004_create_bookings_table;
mod m20250801_000005_create_contracts_table;
mod m20250801_000006_create_notifications_table;
mod m20250801_000007_create_drafts_table;
mod m20250801_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000001_create_profiles_table::Migration),
            Box::new(m20250801_000002_create_requests_table::Migration),
            Box::new(m20250801_000003_create_quotes_table::Migration),
            Box::new(m20250801_000004_create_bookings_table::Migration),
            Box::new(m20250801_000005_create_contracts_table::Migration),
            Box::new(m20250801_000006_create_notifications_table::Migration),
            Box::new(m20250801_000007_create_drafts_table::Migration),
            Box::new(m20250801_000008_add_indexes::Migration),
        ]
    }
}
