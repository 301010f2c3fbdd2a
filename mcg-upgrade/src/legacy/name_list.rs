//! Space-delimited name lists

/// Platform line terminator used when rewriting text files
pub const LINE_ENDING: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Rewrite a space-delimited name list as one name per line
///
/// `data` is the content following the leading delimiter. Every space becomes
/// a line terminator; nothing else changes.
pub fn upgrade_name_list(data: &str) -> String {
    data.replace(' ', LINE_ENDING)
}
