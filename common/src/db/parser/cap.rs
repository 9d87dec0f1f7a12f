//! `.cap` reader.
//!
//! ```text
//! nLayers xSize ySize
//! unit_via_cost
//! <xSize-1 horizontal edge lengths>
//! <ySize-1 vertical edge lengths>
//! name direction          (once per layer)
//! <ySize rows of xSize capacities>
//! ```
//!
//! The file is consumed as a token stream so an empty length row (a grid one
//! cell wide) needs no line of its own, but every row of values must still
//! sit on a single line.

use super::{numbered_lines, open};
use crate::db::core::{CapacityGrid, LayerData, LayerDirection};
use crate::db::indices::LayerId;
use crate::error::FormatError;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

pub fn parse(path: &Path) -> Result<CapacityGrid, FormatError> {
    log::info!("Parsing capacity file: {}", path.display());
    read(open(path)?)
}

pub fn read<R: BufRead>(reader: R) -> Result<CapacityGrid, FormatError> {
    let mut tokens = Tokens::new(reader)?;

    let num_layers: usize = tokens.next_value("layer count")?;
    let header_line = tokens.last_line;
    let x_size: usize = tokens.next_value("grid x size")?;
    let y_size: usize = tokens.next_value("grid y size")?;
    if num_layers == 0 || x_size == 0 || y_size == 0 {
        return Err(FormatError::Malformed {
            line: header_line,
            message: format!(
                "grid dimensions must be positive (layers={}, x={}, y={})",
                num_layers, x_size, y_size
            ),
        });
    }
    if num_layers != 2 {
        log::warn!("Capacity file declares {} layers; designs are expected to have 2", num_layers);
    }

    let unit_via_cost: u64 = tokens.next_value("unit via cost")?;
    let horizontal_edge_lengths = tokens.next_row(x_size - 1, "horizontal edge length")?;
    let vertical_edge_lengths = tokens.next_row(y_size - 1, "vertical edge length")?;

    let mut layers = Vec::with_capacity(num_layers);
    for index in 0..num_layers {
        let name = tokens.next_token("layer name")?.to_string();
        let dir_token = tokens.next_token("layer direction")?.to_string();
        let direction =
            LayerDirection::from_token(&dir_token).ok_or_else(|| FormatError::InvalidToken {
                line: tokens.last_line,
                expected: "layer direction 'H' or 'V'".to_string(),
                found: dir_token.clone(),
            })?;

        let mut capacities = Vec::with_capacity(x_size * y_size);
        for _ in 0..y_size {
            capacities.extend(tokens.next_row::<u32>(x_size, "capacity")?);
        }

        layers.push(LayerData {
            name,
            index: LayerId::new(index),
            direction,
            capacities,
        });
    }

    if tokens.remaining() > 0 {
        log::warn!(
            "Ignoring {} trailing token(s) after the last layer (line {})",
            tokens.remaining(),
            tokens.peek_line().unwrap_or(tokens.last_line)
        );
    }

    Ok(CapacityGrid {
        x_size,
        y_size,
        unit_via_cost,
        horizontal_edge_lengths,
        vertical_edge_lengths,
        layers,
    })
}

struct Tokens {
    tokens: Vec<(usize, String)>,
    pos: usize,
    last_line: usize,
}

impl Tokens {
    fn new<R: BufRead>(reader: R) -> Result<Self, FormatError> {
        let tokens = numbered_lines(reader)?
            .into_iter()
            .filter(|(_, text)| !text.starts_with('#'))
            .flat_map(|(line, text)| {
                text.split_whitespace()
                    .map(|tok| (line, tok.to_string()))
                    .collect::<Vec<_>>()
            })
            .collect();
        Ok(Self {
            tokens,
            pos: 0,
            last_line: 1,
        })
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    fn peek_line(&self) -> Option<usize> {
        self.tokens.get(self.pos).map(|(line, _)| *line)
    }

    fn next_token(&mut self, expected: &str) -> Result<&str, FormatError> {
        let (line, tok) = self
            .tokens
            .get(self.pos)
            .ok_or_else(|| FormatError::UnexpectedEof {
                expected: expected.to_string(),
            })?;
        self.pos += 1;
        self.last_line = *line;
        Ok(tok.as_str())
    }

    fn next_value<T: FromStr>(&mut self, expected: &str) -> Result<T, FormatError> {
        let tok = self.next_token(expected)?;
        match tok.parse() {
            Ok(value) => Ok(value),
            Err(_) => {
                let found = tok.to_string();
                Err(FormatError::InvalidToken {
                    line: self.last_line,
                    expected: expected.to_string(),
                    found,
                })
            }
        }
    }

    /// Reads `count` values that must make up one whole line.
    fn next_row<T: FromStr>(&mut self, count: usize, what: &str) -> Result<Vec<T>, FormatError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let line = self.peek_line().ok_or_else(|| FormatError::UnexpectedEof {
            expected: format!("{} {} values", count, what),
        })?;
        let row = (0..count)
            .map(|_| self.next_value(what))
            .collect::<Result<Vec<T>, _>>()?;
        if self.last_line != line || self.peek_line() == Some(line) {
            return Err(FormatError::Malformed {
                line,
                message: format!("expected exactly {} {} values on this line", count, what),
            });
        }
        Ok(row)
    }
}
