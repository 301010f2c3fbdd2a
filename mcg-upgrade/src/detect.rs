//! Format detection
//!
//! Detectors classify a bounded sample (first byte, first line, or one probe
//! row) as current, legacy, or absent. They never read a whole file and never
//! mutate anything.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Upper bound on bytes read when sampling a first line
const MAX_PROBE_BYTES: u64 = 64 * 1024;

/// Legacy temp-rank lines have at least this many space-separated columns
pub const LEGACY_TEMP_RANK_COLUMNS: usize = 9;

/// Known legacy layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyShape {
    /// Names separated by single spaces, file starts with a space
    SpaceDelimitedNames,
    /// Temp-rank line with raw period and calendar columns
    WideTempRankLine,
    /// Free-form duration text such as `1 day, 02:00:00`
    InformalDuration,
}

/// Detection verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Current,
    Legacy(LegacyShape),
    /// Source does not exist; callers skip
    Absent,
}

impl Format {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Format::Legacy(_))
    }
}

/// A bounded probe of a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sample {
    Absent,
    /// Source exists but holds nothing
    Empty,
    Data(Vec<u8>),
}

impl Sample {
    /// Sample the first byte of a file
    pub fn first_byte(path: &Path) -> io::Result<Sample> {
        let mut file = match open_if_exists(path)? {
            Some(file) => file,
            None => return Ok(Sample::Absent),
        };

        let mut byte = [0u8; 1];
        match file.read(&mut byte)? {
            0 => Ok(Sample::Empty),
            _ => Ok(Sample::Data(byte.to_vec())),
        }
    }

    /// Sample the first line of a file, without its terminator
    pub fn first_line(path: &Path) -> io::Result<Sample> {
        let file = match open_if_exists(path)? {
            Some(file) => file,
            None => return Ok(Sample::Absent),
        };

        let mut reader = BufReader::new(file.take(MAX_PROBE_BYTES));
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(Sample::Empty);
        }
        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        Ok(Sample::Data(line))
    }

    /// Sample taken from a single probe row (`None` = no rows at all)
    pub fn from_value(value: Option<String>) -> Sample {
        match value {
            None => Sample::Absent,
            Some(v) if v.is_empty() => Sample::Empty,
            Some(v) => Sample::Data(v.into_bytes()),
        }
    }
}

fn open_if_exists(path: &Path) -> io::Result<Option<File>> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// One implementation per legacy shape
pub trait FormatDetector {
    fn detect(&self, sample: &Sample) -> Format;
}

/// Legacy name lists start with the delimiter instead of a name
#[derive(Debug, Default, Clone, Copy)]
pub struct NameListDetector;

impl FormatDetector for NameListDetector {
    fn detect(&self, sample: &Sample) -> Format {
        match sample {
            Sample::Absent => Format::Absent,
            Sample::Data(bytes) if bytes.first() == Some(&b' ') => {
                Format::Legacy(LegacyShape::SpaceDelimitedNames)
            }
            _ => Format::Current,
        }
    }
}

/// Legacy temp-rank files have wide lines
#[derive(Debug, Clone, Copy)]
pub struct TempRankDetector {
    pub min_columns: usize,
}

impl Default for TempRankDetector {
    fn default() -> Self {
        Self {
            min_columns: LEGACY_TEMP_RANK_COLUMNS,
        }
    }
}

impl FormatDetector for TempRankDetector {
    fn detect(&self, sample: &Sample) -> Format {
        match sample {
            Sample::Absent => Format::Absent,
            Sample::Empty => Format::Current,
            Sample::Data(bytes) => {
                let columns = bytes.split(|b| *b == b' ').count();
                if columns >= self.min_columns {
                    Format::Legacy(LegacyShape::WideTempRankLine)
                } else {
                    Format::Current
                }
            }
        }
    }
}

/// Current durations are plain seconds; legacy text contains spaces
#[derive(Debug, Default, Clone, Copy)]
pub struct DurationTextDetector;

impl FormatDetector for DurationTextDetector {
    fn detect(&self, sample: &Sample) -> Format {
        match sample {
            Sample::Absent => Format::Absent,
            Sample::Data(bytes) if bytes.contains(&b' ') => {
                Format::Legacy(LegacyShape::InformalDuration)
            }
            _ => Format::Current,
        }
    }
}
