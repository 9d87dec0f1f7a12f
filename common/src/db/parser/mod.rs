pub mod block;
pub mod cap;
pub mod net;
pub mod route;

use crate::error::FormatError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

fn open(path: &Path) -> Result<BufReader<File>, FormatError> {
    let file = File::open(path).map_err(|source| FormatError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Trimmed, non-blank lines with their 1-based line numbers.
fn numbered_lines<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>, FormatError> {
    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| FormatError::Read {
            line: idx + 1,
            source,
        })?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push((idx + 1, line.to_string()));
        }
    }
    Ok(lines)
}
