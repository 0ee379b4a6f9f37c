//! Versioned schema migrations.
//!
//! `m20240101_000001` creates the account tables (`users`,
//! `password_reset_tokens`, `sessions`); `m20240101_000002` creates the
//! challenge tables that reference them. Rolling back runs in reverse order.

pub use sea_orm_migration::MigratorTrait;

use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::MigrationTrait;
use tracing::{info, instrument, warn};

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_challenge_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_challenge_tables::Migration),
        ]
    }
}

/// Applied and pending migration names, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub pending: Vec<String>,
}

/// Apply pending migrations. `steps = None` applies all of them.
#[instrument(skip(db))]
pub async fn migrate_up(db: &DatabaseConnection, steps: Option<u32>) -> Result<(), DbErr> {
    info!("Applying migrations");
    Migrator::up(db, steps).await?;
    info!("Migrations applied");
    Ok(())
}

/// Roll back applied migrations. `steps = None` rolls back all of them.
///
/// Rolling back the first migration drops `users`, `password_reset_tokens`
/// and `sessions` with their data.
#[instrument(skip(db))]
pub async fn migrate_down(db: &DatabaseConnection, steps: Option<u32>) -> Result<(), DbErr> {
    warn!("Rolling back migrations");
    Migrator::down(db, steps).await?;
    info!("Migrations rolled back");
    Ok(())
}

/// Drop every table in the database and apply all migrations from scratch.
#[instrument(skip(db))]
pub async fn migrate_fresh(db: &DatabaseConnection) -> Result<(), DbErr> {
    warn!("Dropping all tables and re-applying migrations");
    Migrator::fresh(db).await
}

/// Roll back all applied migrations, then apply them again.
#[instrument(skip(db))]
pub async fn migrate_refresh(db: &DatabaseConnection) -> Result<(), DbErr> {
    warn!("Rolling back and re-applying all migrations");
    Migrator::refresh(db).await
}

/// Report which migrations have been applied and which are pending.
#[instrument(skip(db))]
pub async fn migration_status(db: &DatabaseConnection) -> Result<MigrationReport, DbErr> {
    let applied = Migrator::get_applied_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    let pending = Migrator::get_pending_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect();

    Ok(MigrationReport { applied, pending })
}
