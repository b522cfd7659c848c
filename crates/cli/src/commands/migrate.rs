use acme_db::migrations::MIGRATOR;

use crate::commands::{with_migrated_pool, CommandResult, StepError};

pub fn run() -> CommandResult {
    let result = with_migrated_pool("migrate", |pool| async move {
        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
            .fetch_one(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;
        Ok::<_, StepError>(applied)
    });

    match result {
        Ok(applied) => CommandResult::success(
            "migrate",
            format!("schema at {applied} of {} migrations", known_migrations()),
        ),
        Err(failure) => failure,
    }
}

fn known_migrations() -> usize {
    MIGRATOR.iter().filter(|migration| !migration.migration_type.is_down_migration()).count()
}
