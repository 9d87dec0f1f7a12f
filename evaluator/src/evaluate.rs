//! Overflow and cost scoring.
//!
//! Demand is charged at most once per net per GCell, so a net whose segments
//! overlap itself is not penalised twice. Wirelength is charged for every
//! unit step of every segment regardless of overlap.

use crate::grid::{DemandGrid, LayerCongestion};
use gr_common::db::core::{CapacityGrid, LayerDirection, RouteSolution, Segment};
use gr_common::geom::coord::GCell;
use gr_common::util::config::EvaluationConfig;
use std::collections::HashSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub overflow: u64,
    pub total_cost: u64,
    pub wirelength_cost: u64,
    pub via_cost: u64,
    pub num_vias: u64,
    pub wirelength: u64,
    pub layers: Vec<LayerCongestion>,
}

pub fn evaluate(cap: &CapacityGrid, routes: &RouteSolution, config: &EvaluationConfig) -> Evaluation {
    let mut grid = DemandGrid::for_capacity(cap);
    let mut used: HashSet<GCell> = HashSet::new();
    let mut num_vias = 0u64;
    let mut wirelength = 0u64;

    for net in &routes.nets {
        used.clear();
        for seg in net.segments() {
            if seg.is_via() {
                num_vias += 1;
                for z in [seg.start.z, seg.end.z] {
                    if let Some(cell) = cap.gcell(z, seg.start.x, seg.start.y)
                        && used.insert(cell)
                    {
                        grid.add_demand(cell);
                    }
                }
            } else {
                let length = charge_wire(cap, seg, config, &mut grid, &mut used);
                wirelength = wirelength.saturating_add(length);
            }
        }
    }

    let layers = grid.layer_congestion(cap);
    let overflow = layers.iter().map(|l| l.overflow).sum();
    let wirelength_cost = wirelength.saturating_mul(config.unit_length_wire_cost);
    let via_cost = num_vias.saturating_mul(cap.unit_via_cost);
    let total_cost = wirelength_cost.saturating_add(via_cost);
    if total_cost == u64::MAX {
        log::warn!("Routing cost saturated at {}; edge lengths or unit costs are too large", u64::MAX);
    }

    log::debug!(
        "Evaluated {} routed nets: wirelength {}, vias {}, overflow {}",
        routes.nets.len(),
        wirelength,
        num_vias,
        overflow
    );

    Evaluation {
        overflow,
        total_cost,
        wirelength_cost,
        via_cost,
        num_vias,
        wirelength,
        layers,
    }
}

/// Charges demand for a same-layer segment and returns the wirelength it adds.
/// Segments that do not run along their layer's direction add nothing.
///
/// Only the part of the span inside the grid is walked; steps outside it add
/// no demand and, when counted, one unit of length each.
fn charge_wire(
    cap: &CapacityGrid,
    seg: &Segment,
    config: &EvaluationConfig,
    grid: &mut DemandGrid,
    used: &mut HashSet<GCell>,
) -> u64 {
    let Some(layer) = cap.layer(seg.start.z) else {
        return 0;
    };
    let z = seg.start.z;
    let (a, b) = (seg.start, seg.end);

    let (r1, r2, extent) = match layer.direction {
        LayerDirection::Horizontal if a.y == b.y => (a.x, b.x, cap.x_size),
        LayerDirection::Vertical if a.x == b.x => (a.y, b.y, cap.y_size),
        _ => return 0,
    };
    let (lo, hi) = (i64::from(r1.min(r2)), i64::from(r1.max(r2)));
    let extent = i64::try_from(extent).unwrap_or(i64::MAX);
    let (in_lo, in_hi) = (lo.max(0), hi.min(extent));

    let mut length = 0u64;
    for step in in_lo..in_hi {
        // in_lo..in_hi lies inside lo..hi, which came from i32 values.
        let step = step as i32;
        let (x, y, edge_length) = match layer.direction {
            LayerDirection::Horizontal => (step, a.y, cap.horizontal_length(step)),
            LayerDirection::Vertical => (a.x, step, cap.vertical_length(step)),
        };
        let cell = cap.gcell(z, x, y);
        if let Some(cell) = cell
            && used.insert(cell)
        {
            grid.add_demand(cell);
        }
        if cell.is_some() || config.count_out_of_bounds_wirelength {
            length = length.saturating_add(edge_length.unwrap_or(1));
        }
    }

    if config.count_out_of_bounds_wirelength {
        let outside = (hi - lo) - (in_hi - in_lo).max(0);
        length = length.saturating_add(outside as u64);
    }
    length
}
