use sea_orm_migration::prelude::*;

mod m20260815_000001_create_students;
mod m20260815_000002_create_auth_codes;
mod m20260815_000003_create_sessions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260815_000001_create_students::Migration),
            Box::new(m20260815_000002_create_auth_codes::Migration),
            Box::new(m20260815_000003_create_sessions::Migration),
        ]
    }
}
