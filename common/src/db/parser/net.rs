//! `.net` reader. Each block body lists pins as `(layer, x, y)`.

use super::block::scan;
use super::open;
use crate::db::core::NetList;
use crate::error::FormatError;
use crate::geom::coord::GridCoord;
use std::io::BufRead;
use std::path::Path;

pub fn parse(path: &Path) -> Result<NetList, FormatError> {
    log::info!("Parsing net file: {}", path.display());
    read(open(path)?)
}

pub fn read<R: BufRead>(reader: R) -> Result<NetList, FormatError> {
    let mut nets = NetList::new();

    for block in scan(reader)? {
        let mut pins = Vec::with_capacity(block.body.len());
        for (line, text) in &block.body {
            match text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
                Some(inner) => pins.push(parse_pin(*line, inner)?),
                None => log::warn!(
                    "Net '{}': skipping non-pin line {}: '{}'",
                    block.name,
                    line,
                    text
                ),
            }
        }
        nets.add_net(block.name, pins);
    }

    log::info!("Read {} nets", nets.num_nets());
    Ok(nets)
}

fn parse_pin(line: usize, inner: &str) -> Result<GridCoord, FormatError> {
    let fields: Vec<&str> = inner.split(',').map(str::trim).collect();
    let [layer, x, y] = fields.as_slice() else {
        return Err(FormatError::Malformed {
            line,
            message: format!("expected pin '(layer,x,y)', found '({})'", inner),
        });
    };

    let value = |tok: &str| {
        tok.parse::<i32>().map_err(|_| FormatError::InvalidToken {
            line,
            expected: "integer pin coordinate".to_string(),
            found: tok.to_string(),
        })
    };
    Ok(GridCoord::new(value(*x)?, value(*y)?, value(*layer)?))
}
