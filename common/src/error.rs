//! Errors raised while reading design files.

use std::path::PathBuf;

/// A design file could not be read or does not follow its grammar.
///
/// Any of these aborts the run: none of the checks can proceed without all
/// three inputs parsed.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The file could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Reading failed part way through.
    #[error("read error at line {line}: {source}")]
    Read {
        line: usize,
        source: std::io::Error,
    },

    /// The file ended while more input was required.
    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    /// A token could not be interpreted as the expected value.
    #[error("line {line}: expected {expected}, found '{found}'")]
    InvalidToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// A line is structurally wrong for its position in the file.
    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// A net block was opened with `(` but never closed.
    #[error("line {line}: block for net '{name}' is never closed")]
    Unterminated { line: usize, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_token_names_line_and_token() {
        let err = FormatError::InvalidToken {
            line: 3,
            expected: "capacity".to_string(),
            found: "x".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("'x'"));
    }

    #[test]
    fn unterminated_names_net() {
        let err = FormatError::Unterminated {
            line: 2,
            name: "net7".to_string(),
        };
        assert_eq!(err.to_string(), "line 2: block for net 'net7' is never closed");
    }
}
