use acme_db::DemoSeed;

use crate::commands::{with_migrated_pool, CommandResult, StepError};

pub fn run() -> CommandResult {
    let result = with_migrated_pool("seed", |pool| async move {
        let loaded = DemoSeed::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 6u8))?;

        let verification = DemoSeed::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        if !verification.all_present {
            return Err(("seed_verification", failed_checks_message(&verification.checks), 6u8));
        }

        Ok::<_, StepError>(loaded)
    });

    match result {
        Ok(loaded) => CommandResult::success(
            "seed",
            format!(
                "demo data present: {} customers, {} invoices",
                loaded.customers, loaded.invoices
            ),
        ),
        Err(failure) => failure,
    }
}

fn failed_checks_message(checks: &[(&'static str, bool)]) -> String {
    let failed_checks = checks
        .iter()
        .filter_map(|(check, passed)| (!passed).then_some(*check))
        .collect::<Vec<_>>();

    if failed_checks.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for checks: {}", failed_checks.join(", "))
    }
}
