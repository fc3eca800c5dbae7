//! Line-oriented text loading.
//!
//! The loader turns raw text into the element sequence a dataset is built
//! from. It strips an optional header line and trims every remaining line.
//! Files are read as UTF-8 when they are valid UTF-8 and as windows-1252
//! otherwise, so legacy single-byte exports keep their accented characters.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use kindle_common::{DatasetResult, ErrorContext};
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

/// Lines ready to be partitioned, plus the header that was split off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLines {
    pub header: Option<String>,
    pub lines: Vec<String>,
}

/// Trim each line and, if `has_header`, split the first line off as the header.
pub fn prepare_lines<I, S>(lines: I, has_header: bool) -> TextLines
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = lines.into_iter().map(|line| line.as_ref().trim().to_string());
    let header = if has_header { lines.next() } else { None };
    TextLines {
        header,
        lines: lines.collect(),
    }
}

/// Read every line of the file at `path`.
pub fn read_lines(path: impl AsRef<Path>) -> DatasetResult<Vec<String>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_io_context(|| format!("Failed to read {}", path.display()))?;
    let (text, encoding) = decode(&bytes);
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    debug!(
        path = %path.display(),
        encoding = encoding.name(),
        lines = lines.len(),
        "read text file"
    );
    Ok(lines)
}

/// Decode as UTF-8, falling back to windows-1252 which maps every byte.
fn decode(bytes: &[u8]) -> (Cow<'_, str>, &'static Encoding) {
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => (text, UTF_8),
        None => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            (text, WINDOWS_1252)
        }
    }
}
