//! `.route` reader. Body lines are `z1 x1 y1 z2 x2 y2`.
//!
//! Lines that are not six integers are kept as malformed records rather than
//! rejected, so the validity checker can report them against their net.

use super::block::scan;
use super::open;
use crate::db::core::{
    MalformedRecord, RecordDefect, RouteRecord, RouteSolution, RoutedNet, Segment,
};
use crate::error::FormatError;
use crate::geom::coord::GridCoord;
use std::io::BufRead;
use std::path::Path;

pub fn parse(path: &Path) -> Result<RouteSolution, FormatError> {
    log::info!("Parsing route file: {}", path.display());
    read(open(path)?)
}

pub fn read<R: BufRead>(reader: R) -> Result<RouteSolution, FormatError> {
    let mut solution = RouteSolution::default();

    for block in scan(reader)? {
        let records = block
            .body
            .into_iter()
            .map(|(line, text)| parse_record(line, &text))
            .collect();
        solution.nets.push(RoutedNet {
            name: block.name,
            records,
        });
    }

    log::info!(
        "Read {} routed nets with {} segments",
        solution.nets.len(),
        solution.total_segments()
    );
    Ok(solution)
}

fn parse_record(line: usize, text: &str) -> RouteRecord {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let malformed = |defect| {
        RouteRecord::Malformed(MalformedRecord {
            line,
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            defect,
        })
    };

    if tokens.len() != 6 {
        return malformed(RecordDefect::WrongArity(tokens.len()));
    }

    let mut values = [0i32; 6];
    for (slot, tok) in values.iter_mut().zip(&tokens) {
        match tok.parse() {
            Ok(v) => *slot = v,
            Err(_) => return malformed(RecordDefect::NonInteger(tok.to_string())),
        }
    }

    let [z1, x1, y1, z2, x2, y2] = values;
    RouteRecord::Segment(Segment::new(
        GridCoord::new(x1, y1, z1),
        GridCoord::new(x2, y2, z2),
    ))
}
