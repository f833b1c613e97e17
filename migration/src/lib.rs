pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_companies_table;
mod m20250601_000002_create_investment_theses_table;
mod m20250601_000003_create_deals_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_companies_table::Migration),
            Box::new(m20250601_000002_create_investment_theses_table::Migration),
            // deals reference both tables above, keep it last
            Box::new(m20250601_000003_create_deals_table::Migration),
        ]
    }
}
