//! `ranks/agreed.txt`: space-delimited names to one name per line

use crate::context::UpgradeContext;
use crate::detect::{Format, FormatDetector, NameListDetector, Sample};
use crate::error::{IoContext, Result};
use crate::file_migrator::write_file;
use crate::legacy::upgrade_name_list;
use crate::report::{BatchResult, SkipReason};
use crate::steps::Guard;
use std::fs;
use tracing::info;

pub fn guard(ctx: &UpgradeContext) -> Result<Guard> {
    let path = ctx.layout.agreed_file();
    let sample = Sample::first_byte(&path).at(&path)?;

    Ok(match NameListDetector.detect(&sample) {
        Format::Absent => Guard::Skip(SkipReason::SourceAbsent),
        Format::Current => Guard::Skip(SkipReason::AlreadyCurrent),
        Format::Legacy(_) => Guard::Pending,
    })
}

pub fn apply(ctx: &UpgradeContext) -> Result<BatchResult> {
    let path = ctx.layout.agreed_file();
    info!("Upgrading {} to one name per line..", path.display());
    let content = fs::read_to_string(&path).at(&path)?;

    let mut batch = BatchResult::default();
    // Leading delimiter is the legacy marker, not part of a name
    let Some(data) = content.strip_prefix(' ') else {
        return Ok(batch);
    };

    write_file(&path, &upgrade_name_list(data))?;
    batch.record_success();

    info!("Converted {} to one name per line", path.display());
    Ok(batch)
}
