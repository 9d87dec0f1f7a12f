//! Structural checks on every routed segment: record shape, grid bounds,
//! alignment with the layer's preferred direction, and via shape.
//!
//! Every violation in a net is collected; nothing short-circuits.

use gr_common::db::core::{
    CapacityGrid, LayerDirection, RecordDefect, RouteRecord, RouteSolution, RoutedNet, Segment,
};
use gr_common::geom::coord::GridCoord;
use rayon::prelude::*;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StructuralViolation {
    #[error("invalid format (expected 6 values, got {found})")]
    WrongArity { found: usize },

    #[error("non-integer value '{token}'")]
    NonInteger { token: String },

    #[error("x out of bounds (x1={x1}, x2={x2}, xSize={x_size})")]
    XOutOfBounds { x1: i32, x2: i32, x_size: usize },

    #[error("y out of bounds (y1={y1}, y2={y2}, ySize={y_size})")]
    YOutOfBounds { y1: i32, y2: i32, y_size: usize },

    #[error("layer out of bounds (z1={z1}, z2={z2}, nLayers={num_layers})")]
    LayerOutOfBounds { z1: i32, z2: i32, num_layers: usize },

    #[error("on {direction} layer {layer} but {axis}1={v1} != {axis}2={v2}")]
    OffAxis {
        direction: LayerDirection,
        layer: i32,
        axis: char,
        v1: i32,
        v2: i32,
    },

    #[error("on {direction} layer {layer} but {axis}1 == {axis}2 == {value} (zero-length segment)")]
    ZeroLength {
        direction: LayerDirection,
        layer: i32,
        axis: char,
        value: i32,
    },

    #[error("via endpoints differ ({from} -> {to})")]
    ViaMisaligned { from: GridCoord, to: GridCoord },
}

/// A violation attached to the position of its record in the net body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentViolation {
    pub segment: usize,
    pub violation: StructuralViolation,
}

impl fmt::Display for SegmentViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Segment {}: {}", self.segment, self.violation)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetValidity {
    pub name: String,
    pub num_segments: usize,
    pub errors: Vec<SegmentViolation>,
}

impl NetValidity {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidityReport {
    pub all_valid: bool,
    pub invalid_nets: Vec<String>,
    /// One entry per routed block, in file order.
    pub nets: Vec<NetValidity>,
}

impl ValidityReport {
    pub fn invalid(&self) -> impl Iterator<Item = &NetValidity> {
        self.nets.iter().filter(|net| !net.is_valid())
    }
}

pub fn check_validity(cap: &CapacityGrid, routes: &RouteSolution) -> ValidityReport {
    let nets: Vec<NetValidity> = routes.nets.par_iter().map(|net| check_net(cap, net)).collect();
    let invalid_nets: Vec<String> = nets
        .iter()
        .filter(|net| !net.is_valid())
        .map(|net| net.name.clone())
        .collect();

    if invalid_nets.is_empty() {
        log::info!("\x1b[32mPASS\x1b[0m: All {} routed nets are structurally valid.", nets.len());
    } else {
        log::error!("\x1b[31mFAIL\x1b[0m: {} net(s) have invalid routes", invalid_nets.len());
    }

    ValidityReport {
        all_valid: invalid_nets.is_empty(),
        invalid_nets,
        nets,
    }
}

fn check_net(cap: &CapacityGrid, net: &RoutedNet) -> NetValidity {
    let mut errors = Vec::new();

    for (segment, record) in net.records.iter().enumerate() {
        let mut push = |violation| errors.push(SegmentViolation { segment, violation });
        match record {
            RouteRecord::Malformed(m) => push(match &m.defect {
                RecordDefect::WrongArity(found) => StructuralViolation::WrongArity { found: *found },
                RecordDefect::NonInteger(token) => StructuralViolation::NonInteger {
                    token: token.clone(),
                },
            }),
            RouteRecord::Segment(seg) => check_segment(cap, seg, &mut push),
        }
    }

    NetValidity {
        name: net.name.clone(),
        num_segments: net.records.len(),
        errors,
    }
}

fn check_segment(cap: &CapacityGrid, seg: &Segment, push: &mut impl FnMut(StructuralViolation)) {
    let (a, b) = (seg.start, seg.end);

    if !(cap.contains_x(a.x) && cap.contains_x(b.x)) {
        push(StructuralViolation::XOutOfBounds {
            x1: a.x,
            x2: b.x,
            x_size: cap.x_size,
        });
    }
    if !(cap.contains_y(a.y) && cap.contains_y(b.y)) {
        push(StructuralViolation::YOutOfBounds {
            y1: a.y,
            y2: b.y,
            y_size: cap.y_size,
        });
    }
    if !(cap.contains_layer(a.z) && cap.contains_layer(b.z)) {
        push(StructuralViolation::LayerOutOfBounds {
            z1: a.z,
            z2: b.z,
            num_layers: cap.num_layers(),
        });
    }

    if seg.is_via() {
        if a.x != b.x || a.y != b.y {
            push(StructuralViolation::ViaMisaligned { from: a, to: b });
        }
        return;
    }

    // Out-of-range layers were reported above and have no direction.
    let Some(layer) = cap.layer(a.z) else {
        return;
    };
    let direction = layer.direction;
    let ((fixed_axis, f1, f2), (run_axis, r1, r2)) = match direction {
        LayerDirection::Horizontal => (('y', a.y, b.y), ('x', a.x, b.x)),
        LayerDirection::Vertical => (('x', a.x, b.x), ('y', a.y, b.y)),
    };
    if f1 != f2 {
        push(StructuralViolation::OffAxis {
            direction,
            layer: a.z,
            axis: fixed_axis,
            v1: f1,
            v2: f2,
        });
    }
    if r1 == r2 {
        push(StructuralViolation::ZeroLength {
            direction,
            layer: a.z,
            axis: run_axis,
            value: r1,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gr_common::db::core::{LayerData, MalformedRecord};
    use gr_common::db::indices::LayerId;

    fn cap() -> CapacityGrid {
        let layer = |i: usize, direction| LayerData {
            name: format!("M{}", i + 1),
            index: LayerId::new(i),
            direction,
            capacities: vec![1; 16],
        };
        CapacityGrid {
            x_size: 4,
            y_size: 4,
            unit_via_cost: 1,
            horizontal_edge_lengths: vec![1; 3],
            vertical_edge_lengths: vec![1; 3],
            layers: vec![
                layer(0, LayerDirection::Horizontal),
                layer(1, LayerDirection::Vertical),
            ],
        }
    }

    fn seg(x1: i32, y1: i32, z1: i32, x2: i32, y2: i32, z2: i32) -> RouteRecord {
        RouteRecord::Segment(Segment::new(
            GridCoord::new(x1, y1, z1),
            GridCoord::new(x2, y2, z2),
        ))
    }

    fn single(records: Vec<RouteRecord>) -> RouteSolution {
        RouteSolution {
            nets: vec![RoutedNet {
                name: "n0".to_string(),
                records,
            }],
        }
    }

    fn violations(records: Vec<RouteRecord>) -> Vec<StructuralViolation> {
        let report = check_validity(&cap(), &single(records));
        report.nets[0]
            .errors
            .iter()
            .map(|e| e.violation.clone())
            .collect()
    }

    #[test]
    fn well_formed_route_is_valid() {
        let report = check_validity(
            &cap(),
            &single(vec![
                seg(0, 1, 0, 3, 1, 0),
                seg(3, 1, 0, 3, 1, 1),
                seg(3, 1, 1, 3, 3, 1),
            ]),
        );
        assert!(report.all_valid);
        assert!(report.invalid_nets.is_empty());
        assert_eq!(report.nets[0].num_segments, 3);
    }

    #[test]
    fn horizontal_layer_requires_equal_y_and_distinct_x() {
        let found = violations(vec![seg(1, 0, 0, 1, 2, 0)]);
        assert_eq!(found.len(), 2);
        assert!(matches!(
            found[0],
            StructuralViolation::OffAxis {
                direction: LayerDirection::Horizontal,
                axis: 'y',
                ..
            }
        ));
        assert!(matches!(
            found[1],
            StructuralViolation::ZeroLength {
                direction: LayerDirection::Horizontal,
                axis: 'x',
                value: 1,
                ..
            }
        ));
        assert!(found[0].to_string().contains("on H layer 0"));
    }

    #[test]
    fn vertical_layer_zero_length_is_an_error() {
        let found = violations(vec![seg(2, 2, 1, 2, 2, 1)]);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].to_string(),
            "on V layer 1 but y1 == y2 == 2 (zero-length segment)"
        );
    }

    #[test]
    fn via_must_keep_xy() {
        let found = violations(vec![seg(0, 0, 0, 1, 0, 1)]);
        assert_eq!(
            found,
            vec![StructuralViolation::ViaMisaligned {
                from: GridCoord::new(0, 0, 0),
                to: GridCoord::new(1, 0, 1),
            }]
        );
    }

    #[test]
    fn bounds_violations_are_all_collected() {
        let found = violations(vec![seg(-1, 0, 0, 4, 5, 2)]);
        assert!(found.contains(&StructuralViolation::XOutOfBounds {
            x1: -1,
            x2: 4,
            x_size: 4
        }));
        assert!(found.contains(&StructuralViolation::YOutOfBounds {
            y1: 0,
            y2: 5,
            y_size: 4
        }));
        assert!(found.contains(&StructuralViolation::LayerOutOfBounds {
            z1: 0,
            z2: 2,
            num_layers: 2
        }));
    }

    #[test]
    fn unknown_layer_skips_direction_checks() {
        let found = violations(vec![seg(0, 0, 3, 0, 0, 3)]);
        assert_eq!(found.len(), 1);
        assert!(matches!(found[0], StructuralViolation::LayerOutOfBounds { .. }));
    }

    #[test]
    fn malformed_records_are_reported_with_their_index() {
        let report = check_validity(
            &cap(),
            &single(vec![
                seg(0, 0, 0, 1, 0, 0),
                RouteRecord::Malformed(MalformedRecord {
                    line: 4,
                    tokens: vec!["0".to_string(); 5],
                    defect: RecordDefect::WrongArity(5),
                }),
                RouteRecord::Malformed(MalformedRecord {
                    line: 5,
                    tokens: Vec::new(),
                    defect: RecordDefect::NonInteger("x".to_string()),
                }),
            ]),
        );
        assert!(!report.all_valid);
        assert_eq!(report.invalid_nets, vec!["n0".to_string()]);
        let errors = &report.nets[0].errors;
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].to_string(),
            "Segment 1: invalid format (expected 6 values, got 5)"
        );
        assert_eq!(errors[1].segment, 2);
    }

    #[test]
    fn report_keeps_route_order() {
        let routes = RouteSolution {
            nets: (0..20)
                .map(|i| RoutedNet {
                    name: format!("n{}", i),
                    records: if i % 3 == 0 {
                        vec![seg(0, 0, 0, 0, 0, 0)]
                    } else {
                        vec![seg(0, 0, 0, 1, 0, 0)]
                    },
                })
                .collect(),
        };
        let report = check_validity(&cap(), &routes);
        let names: Vec<_> = report.nets.iter().map(|n| n.name.clone()).collect();
        let expected: Vec<_> = (0..20).map(|i| format!("n{}", i)).collect();
        assert_eq!(names, expected);
        assert_eq!(report.invalid_nets.len(), 7);
        assert_eq!(report.invalid().count(), 7);
    }
}
