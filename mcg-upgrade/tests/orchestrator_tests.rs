//! Full startup pass over a scratch server folder
//!
//! Covers:
//! - every step completes against a legacy fixture
//! - a second pass skips everything
//! - one failing step does not stop later steps
//! - steps disabled by configuration are skipped

use mcg_common::ServerLayout;
use mcg_upgrade::{
    BatchResult, MigrationStep, Orchestrator, SkipReason, StepOutcome, UpgradeContext,
    UpgradeSettings, STARTUP_STEPS,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

async fn players(rows: &[(i64, &str)]) -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::query("CREATE TABLE Players (ID INTEGER PRIMARY KEY, TimeSpent TEXT)")
        .execute(&pool)
        .await
        .unwrap();
    for (id, time) in rows {
        sqlx::query("INSERT INTO Players (ID, TimeSpent) VALUES (?, ?)")
            .bind(id)
            .bind(time)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool
}

fn legacy_fixture(layout: &ServerLayout) {
    write(&layout.agreed_file(), " alice bob");
    write(&layout.levels_dir().join("main.lvl.prev"), "old");
    write(&layout.level_properties_file("main"), "motd = hi\n");
    write(
        &layout.level_properties_dir().join("main.env"),
        "Weather = 1\n",
    );
    write(&layout.temp_ranks_file(), "x 2 1 3 30 14 5 6 2020 admin\n");
    write(
        &layout.bots_file(),
        r#"[{"Name": "guard", "Level": "main"}]"#,
    );
}

#[tokio::test]
async fn test_full_pass_then_idempotent() {
    let dir = TempDir::new().unwrap();
    let layout = ServerLayout::new(dir.path());
    legacy_fixture(&layout);
    let pool = players(&[(1, "1 day, 02:00:00")]).await;
    let ctx = UpgradeContext::new(layout).with_database(pool.clone());

    let summary = Orchestrator::startup().run(&ctx).await;

    assert_eq!(summary.outcomes.len(), STARTUP_STEPS.len());
    assert_eq!(summary.completed(), STARTUP_STEPS.len());
    assert_eq!(summary.failed().count(), 0);
    for (step, outcome) in &summary.outcomes {
        assert_eq!(
            outcome.batch(),
            Some(BatchResult { processed: 1, failed: 0 }),
            "{}",
            step
        );
    }

    let time_spent: String = sqlx::query_scalar("SELECT TimeSpent FROM Players WHERE ID = 1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(time_spent, "93600");
    assert!(ctx.layout.prev_levels_dir().join("main.lvl.prev").is_file());
    assert!(ctx.layout.level_bots_file("main").is_file());

    let second = Orchestrator::startup().run(&ctx).await;
    for (step, outcome) in &second.outcomes {
        assert!(outcome.is_skipped(), "{} ran again: {:?}", step, outcome);
    }
}

#[tokio::test]
async fn test_failing_step_does_not_block_later_steps() {
    let dir = TempDir::new().unwrap();
    let layout = ServerLayout::new(dir.path());
    write(&layout.bots_file(), "{ not json");
    let pool = players(&[(1, "0 0 1 0")]).await;
    let ctx = UpgradeContext::new(layout).with_database(pool);

    let summary = Orchestrator::startup().run(&ctx).await;

    assert_eq!(
        summary.failed().collect::<Vec<_>>(),
        vec![MigrationStep::UpgradeBots]
    );
    assert_eq!(
        summary
            .outcome(MigrationStep::UpgradeDbTimeSpent)
            .and_then(StepOutcome::batch),
        Some(BatchResult { processed: 1, failed: 0 })
    );
}

#[tokio::test]
async fn test_disabled_step_skipped() {
    let dir = TempDir::new().unwrap();
    let layout = ServerLayout::new(dir.path());
    write(&layout.agreed_file(), " alice bob");
    let ctx = UpgradeContext::new(layout).with_settings(UpgradeSettings {
        default_assigner: String::new(),
        skip_steps: vec!["upgrade_old_agreed".to_string()],
    });

    let summary = Orchestrator::startup().run(&ctx).await;

    assert!(matches!(
        summary.outcome(MigrationStep::UpgradeOldAgreed),
        Some(StepOutcome::Skipped(SkipReason::Disabled))
    ));
    assert_eq!(
        fs::read_to_string(ctx.layout.agreed_file()).unwrap(),
        " alice bob"
    );
}

#[tokio::test]
async fn test_empty_root_skips_everything() {
    let dir = TempDir::new().unwrap();
    let ctx = UpgradeContext::new(ServerLayout::new(dir.path()));

    let summary = Orchestrator::only(&[
        MigrationStep::UpgradeBots,
        MigrationStep::UpgradeDbTimeSpent,
    ])
    .run(&ctx)
    .await;

    assert_eq!(summary.outcomes.len(), 2);
    for (_, outcome) in &summary.outcomes {
        assert!(matches!(outcome, StepOutcome::Skipped(SkipReason::SourceAbsent)));
    }
}
