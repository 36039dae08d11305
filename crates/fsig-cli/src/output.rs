//! Writing the manifest.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Writes `contents` to `path` through a temporary file in the same
/// directory, so readers see either the old file or the complete new one.
pub fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// First line where a regenerated manifest and the file on disk disagree.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LineDiff {
    /// 1-based line number.
    pub line: usize,
    /// Line from the regenerated manifest, if it has one here.
    pub expected: Option<String>,
    /// Line from the file on disk, if it has one here.
    pub actual: Option<String>,
}

/// Compares two manifests line by line.
pub fn first_difference(expected: &str, actual: &str) -> Option<LineDiff> {
    if expected == actual {
        return None;
    }

    let mut exp = expected.split('\n');
    let mut act = actual.split('\n');
    let mut line = 0;
    loop {
        line += 1;
        match (exp.next(), act.next()) {
            (Some(e), Some(a)) if e == a => continue,
            (e, a) => {
                return Some(LineDiff {
                    line,
                    expected: e.map(str::to_string),
                    actual: a.map(str::to_string),
                })
            }
        }
    }
}
