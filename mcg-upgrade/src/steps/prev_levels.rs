//! `levels/*.prev` backups move into `levels/prev/`

use crate::context::UpgradeContext;
use crate::error::{IoContext, Result};
use crate::file_migrator::{migrate_each, FileSet, FileSetScan};
use crate::report::{BatchResult, SkipReason};
use crate::steps::Guard;
use std::fs;
use tracing::info;

const PREV_EXTENSION: &str = "prev";

fn scan(ctx: &UpgradeContext) -> Result<FileSetScan> {
    let levels = ctx.layout.levels_dir();
    let prev = ctx.layout.prev_levels_dir();
    FileSet::new(&levels, PREV_EXTENSION)
        .with_done_marker(&prev)
        .scan()
}

pub fn guard(ctx: &UpgradeContext) -> Result<Guard> {
    Ok(match scan(ctx)? {
        FileSetScan::SourceAbsent => Guard::Skip(SkipReason::SourceAbsent),
        FileSetScan::AlreadyMigrated => Guard::Skip(SkipReason::AlreadyCurrent),
        FileSetScan::Files(files) if files.is_empty() => Guard::Skip(SkipReason::AlreadyCurrent),
        FileSetScan::Files(_) => Guard::Pending,
    })
}

pub fn apply(ctx: &UpgradeContext) -> Result<BatchResult> {
    let files = match scan(ctx)? {
        FileSetScan::Files(files) if !files.is_empty() => files,
        _ => return Ok(BatchResult::default()),
    };

    let prev = ctx.layout.prev_levels_dir();
    fs::create_dir_all(&prev).at(&prev)?;
    info!("Moving {} .prev files into {}", files.len(), prev.display());

    Ok(migrate_each("move_previous_level_files", &files, |file| {
        let Some(name) = file.file_name() else {
            return Ok(());
        };
        fs::rename(file, prev.join(name)).at(file)
    }))
}
