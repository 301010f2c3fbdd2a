//! Merge `<map>.env` into `<map>.properties`

use crate::context::UpgradeContext;
use crate::error::{Result, UpgradeError};
use crate::file_migrator::{
    migrate_each, read_lines, read_lines_or_empty, remove_source, write_lines, FileSet, FileSetScan,
};
use crate::legacy::merge_property_lines;
use crate::report::{BatchResult, SkipReason};
use crate::steps::Guard;
use std::path::Path;
use tracing::info;

const ENV_EXTENSION: &str = "env";

fn scan(ctx: &UpgradeContext) -> Result<FileSetScan> {
    let dir = ctx.layout.level_properties_dir();
    FileSet::new(&dir, ENV_EXTENSION).scan()
}

pub fn guard(ctx: &UpgradeContext) -> Result<Guard> {
    Ok(match scan(ctx)? {
        FileSetScan::Files(files) if !files.is_empty() => Guard::Pending,
        FileSetScan::Files(_) | FileSetScan::AlreadyMigrated => {
            Guard::Skip(SkipReason::AlreadyCurrent)
        }
        FileSetScan::SourceAbsent => Guard::Skip(SkipReason::SourceAbsent),
    })
}

pub fn apply(ctx: &UpgradeContext) -> Result<BatchResult> {
    let files = match scan(ctx)? {
        FileSetScan::Files(files) => files,
        _ => return Ok(BatchResult::default()),
    };
    if files.is_empty() {
        return Ok(BatchResult::default());
    }

    info!("Combining {} .env and .properties files..", files.len());
    let batch = migrate_each("combine_env_files", &files, |env_path| combine(ctx, env_path));
    info!("Finished combining .env and .properties files.");

    Ok(batch)
}

fn combine(ctx: &UpgradeContext, env_path: &Path) -> Result<()> {
    let map = env_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| UpgradeError::malformed(env_path.display().to_string(), "unusable map name"))?;
    let props_path = ctx.layout.level_properties_file(map);

    let merged = merge_property_lines(read_lines_or_empty(&props_path)?, read_lines(env_path)?);

    write_lines(&props_path, &merged)?;
    remove_source(env_path)
}
