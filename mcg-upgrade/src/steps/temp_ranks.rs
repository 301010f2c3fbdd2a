//! `text/tempranks.txt`: calendar columns to epoch timestamps

use crate::context::UpgradeContext;
use crate::detect::{Format, FormatDetector, Sample, TempRankDetector};
use crate::error::{IoContext, Result};
use crate::file_migrator::{read_lines, write_lines};
use crate::legacy::upgrade_temp_rank_line;
use crate::report::{BatchResult, SkipReason};
use crate::steps::Guard;
use tracing::{error, info};

pub fn guard(ctx: &UpgradeContext) -> Result<Guard> {
    let path = ctx.layout.temp_ranks_file();
    let sample = Sample::first_line(&path).at(&path)?;

    Ok(match TempRankDetector::default().detect(&sample) {
        Format::Absent => Guard::Skip(SkipReason::SourceAbsent),
        Format::Current => Guard::Skip(SkipReason::AlreadyCurrent),
        Format::Legacy(_) => Guard::Pending,
    })
}

/// Rewrite every wide line; malformed lines are kept verbatim
pub fn apply(ctx: &UpgradeContext) -> Result<BatchResult> {
    let path = ctx.layout.temp_ranks_file();
    let detector = TempRankDetector::default();
    let assigner = ctx.settings.default_assigner.as_str();

    info!("Upgrading temp ranks in {}..", path.display());
    let mut lines = read_lines(&path)?;
    let mut batch = BatchResult::default();

    for (i, line) in lines.iter_mut().enumerate() {
        let sample = Sample::Data(line.as_bytes().to_vec());
        if !detector.detect(&sample).is_legacy() {
            continue;
        }

        let unit = format!("{} line {}", path.display(), i + 1);
        match upgrade_temp_rank_line(line, &unit, assigner) {
            Ok(upgraded) => {
                *line = upgraded;
                batch.record_success();
            }
            Err(e) => {
                error!("Error upgrading temp rank: {}", e);
                batch.record_failure();
            }
        }
    }

    write_lines(&path, &lines)?;
    info!("Upgraded {} temp ranks ({} failed)", batch.processed, batch.failed);
    Ok(batch)
}
