//! `extra/bots.json` split into one file per level

use crate::context::UpgradeContext;
use crate::error::{IoContext, Result, UpgradeError};
use crate::file_migrator::{remove_source, write_file};
use crate::legacy::{decode_bots, group_by_level};
use crate::report::{BatchResult, SkipReason};
use crate::steps::Guard;
use std::fs;
use tracing::{error, info, warn};

pub fn guard(ctx: &UpgradeContext) -> Result<Guard> {
    Ok(if ctx.layout.bots_file().is_file() {
        Guard::Pending
    } else {
        Guard::Skip(SkipReason::SourceAbsent)
    })
}

/// Level names become file names; refuse anything that would escape the bots dir
fn checked_level_name(level: &str) -> Result<&str> {
    let escapes = level == "." || level.contains("..") || level.contains(|c: char| c == '/' || c == '\\');
    if escapes {
        Err(UpgradeError::malformed(
            format!("bots for level {:?}", level),
            "level name is not a plain file name",
        ))
    } else {
        Ok(level)
    }
}

pub fn apply(ctx: &UpgradeContext) -> Result<BatchResult> {
    let source = ctx.layout.bots_file();
    let backup = ctx.layout.bots_backup_file();

    let json = fs::read_to_string(&source).at(&source)?;
    write_file(&backup, &json)?;
    info!(
        "Making bots file per-level.. saved backup of global bots file to {}",
        backup.display()
    );

    let bots = decode_bots(&json).map_err(|e| UpgradeError::Json {
        path: source.clone(),
        source: e,
    })?;
    let total = bots.len();
    let groups = group_by_level(bots);
    let kept: usize = groups.iter().map(|(_, group)| group.len()).sum();
    if kept < total {
        info!("Dropping {} bots that are not on any level", total - kept);
    }

    let mut batch = BatchResult::default();
    for (level, group) in &groups {
        let written = checked_level_name(level).and_then(|level| {
            let path = ctx.layout.level_bots_file(level);
            let json = serde_json::to_string(group).map_err(|e| UpgradeError::Json {
                path: path.clone(),
                source: e,
            })?;
            write_file(&path, &json)
        });

        match written {
            Ok(()) => batch.record_success(),
            Err(e) => {
                error!("Error writing bots for level {}: {}", level, e);
                batch.record_failure();
            }
        }
    }

    if batch.failed > 0 {
        warn!(
            "Kept {} because {} level files could not be written",
            source.display(),
            batch.failed
        );
        return Ok(batch);
    }

    remove_source(&source)?;
    Ok(batch)
}
