//! The bracketed net-block layout shared by `.net` and `.route` files:
//!
//! ```text
//! net_name
//! (
//! <body line>
//! ...
//! )
//! ```

use super::numbered_lines;
use crate::error::FormatError;
use std::io::BufRead;

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Block {
    pub name: String,
    pub line: usize,
    pub body: Vec<(usize, String)>,
}

pub(crate) fn scan<R: BufRead>(reader: R) -> Result<Vec<Block>, FormatError> {
    let mut lines = numbered_lines(reader)?.into_iter().peekable();
    let mut blocks = Vec::new();

    while let Some((line, text)) = lines.next() {
        if text.starts_with('(') || text == ")" {
            log::warn!("Skipping stray line {} outside any net block: '{}'", line, text);
            continue;
        }

        let mut body = Vec::new();
        if let Some((open_line, _)) = lines.next_if(|(_, t)| t == "(") {
            loop {
                match lines.next() {
                    Some((_, t)) if t == ")" => break,
                    Some(entry) => body.push(entry),
                    None => {
                        return Err(FormatError::Unterminated {
                            line: open_line,
                            name: text,
                        });
                    }
                }
            }
        }

        blocks.push(Block {
            name: text,
            line,
            body,
        });
    }

    Ok(blocks)
}
