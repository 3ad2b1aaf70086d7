pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_users;
mod m20261001_000002_create_microposts;
mod m20261001_000003_create_relationships;
mod m20261001_000004_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_users::Migration),
            Box::new(m20261001_000002_create_microposts::Migration),
            Box::new(m20261001_000003_create_relationships::Migration),
            Box::new(m20261001_000004_add_indexes::Migration),
        ]
    }
}
