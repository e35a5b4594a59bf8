// src/cli/migrate.rs — Database migration command
//
// Migrations run automatically at startup; this gives visibility and a way
// back during development.

use crate::infra::paths;
use crate::memory::schema;

pub async fn run_migrate(status_only: bool, rollback: bool) -> anyhow::Result<()> {
    let db_path = paths::db_path();

    if !db_path.exists() && (status_only || rollback) {
        println!("No database found at: {}", db_path.display());
        println!("Run `tripmate migrate` to create it.");
        return Ok(());
    }

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = rusqlite::Connection::open(&db_path)?;

    if status_only {
        return show_migration_status(&conn);
    }

    if rollback {
        match schema::rollback_last(&conn)? {
            Some(version) => println!("Rolled back migration v{version}. Its tables were dropped."),
            None => println!("No migrations to roll back."),
        }
        return Ok(());
    }

    println!("Running database migrations...");
    schema::run_migrations(&conn)?;
    println!("Migrations complete.");
    show_migration_status(&conn)
}

fn show_migration_status(conn: &rusqlite::Connection) -> anyhow::Result<()> {
    let applied = schema::applied_migrations(conn)?;
    println!("Database: {}", paths::db_path().display());
    println!(
        "Schema version: {} (latest {})",
        schema::current_version(conn)?,
        schema::latest_version()
    );
    if applied.is_empty() {
        println!("No migrations have been run yet.");
        return Ok(());
    }
    println!();
    println!("Applied migrations:");
    for m in applied {
        println!("  v{}: {} (applied {})", m.version, m.name, m.applied_at);
    }
    Ok(())
}
