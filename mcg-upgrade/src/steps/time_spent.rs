//! `Players.TimeSpent`: legacy duration text to total seconds

use crate::context::UpgradeContext;
use crate::detect::{DurationTextDetector, Format};
use crate::error::Result;
use crate::legacy::upgrade_time_spent;
use crate::report::{BatchResult, SkipReason};
use crate::row_migrator::{BulkRowMigrator, ColumnProjection};
use crate::steps::Guard;
use mcg_common::db::table_exists;
use sqlx::SqlitePool;
use tracing::info;

pub const PLAYERS_TIME_SPENT: ColumnProjection<'static> = ColumnProjection {
    table: "Players",
    key_column: "ID",
    value_column: "TimeSpent",
};

fn migrator(pool: &SqlitePool) -> BulkRowMigrator<'_, DurationTextDetector> {
    BulkRowMigrator::new(pool, PLAYERS_TIME_SPENT, DurationTextDetector)
}

pub async fn guard(ctx: &UpgradeContext) -> Result<Guard> {
    let Some(pool) = &ctx.db else {
        return Ok(Guard::Skip(SkipReason::SourceAbsent));
    };
    if !table_exists(pool, PLAYERS_TIME_SPENT.table).await? {
        return Ok(Guard::Skip(SkipReason::SourceAbsent));
    }

    Ok(match migrator(pool).probe().await? {
        // no players at all
        Format::Absent => Guard::Skip(SkipReason::SourceAbsent),
        Format::Current => Guard::Skip(SkipReason::AlreadyCurrent),
        Format::Legacy(_) => Guard::Pending,
    })
}

pub async fn apply(ctx: &UpgradeContext) -> Result<BatchResult> {
    let Some(pool) = &ctx.db else {
        return Ok(BatchResult::default());
    };
    let migrator = migrator(pool);

    info!("Upgrading TimeSpent column in database to new format..");
    let decoded = migrator.decode(upgrade_time_spent).await?;
    migrator.apply(&decoded).await?;

    info!(
        "Upgraded {} of {} rows. ({} rows failed)",
        decoded.batch.processed,
        decoded.total_rows(),
        decoded.batch.failed
    );
    Ok(decoded.batch)
}
