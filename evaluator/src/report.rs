//! Plain-text rendering of the three result sections.

use crate::check::{ConnectivityReport, ValidityReport};
use crate::evaluate::Evaluation;
use std::io::{self, Write};

/// `max_errors_per_net == 0` lists every error.
pub fn write_validity<W: Write>(
    out: &mut W,
    report: &ValidityReport,
    max_errors_per_net: usize,
) -> io::Result<()> {
    writeln!(out, "=== Route Validity Check ===")?;
    if report.all_valid {
        writeln!(out, "PASS: All {} routed nets are valid.", report.nets.len())?;
        return Ok(());
    }

    writeln!(out, "FAIL: {} net(s) have invalid routes:", report.invalid_nets.len())?;
    for net in report.invalid() {
        writeln!(out)?;
        writeln!(out, "  Net: {}", net.name)?;
        let shown = match max_errors_per_net {
            0 => net.errors.len(),
            max => max.min(net.errors.len()),
        };
        for error in &net.errors[..shown] {
            writeln!(out, "    - {}", error)?;
        }
        if shown < net.errors.len() {
            writeln!(out, "    ... and {} more", net.errors.len() - shown)?;
        }
    }
    Ok(())
}

pub fn write_connectivity<W: Write>(out: &mut W, report: &ConnectivityReport) -> io::Result<()> {
    writeln!(out, "=== Connectivity Check ===")?;
    if report.all_connected {
        writeln!(out, "PASS: All {} nets are properly connected.", report.nets.len())?;
        return Ok(());
    }

    writeln!(
        out,
        "FAIL: {} net(s) are NOT properly connected:",
        report.disconnected_nets.len()
    )?;
    for (name, reason) in report.disconnected() {
        writeln!(out, "  - {}: {}", name, reason)?;
    }
    Ok(())
}

pub fn write_evaluation<W: Write>(
    out: &mut W,
    result: &Evaluation,
    layer_breakdown: bool,
) -> io::Result<()> {
    writeln!(out, "=== Routing Evaluation ===")?;
    writeln!(out, "Total Overflow: {}", result.overflow)?;
    writeln!(out, "Total Cost: {}", result.total_cost)?;
    writeln!(
        out,
        "  - Wirelength Cost: {} (wirelength {})",
        result.wirelength_cost, result.wirelength
    )?;
    writeln!(
        out,
        "  - Via Cost: {} ({} vias)",
        result.via_cost, result.num_vias
    )?;

    if layer_breakdown {
        writeln!(out, "Per-layer congestion:")?;
        for layer in &result.layers {
            writeln!(
                out,
                "  {}: overflow {}, overflowed GCells {}, max demand {}",
                layer.name, layer.overflow, layer.overflowed_cells, layer.max_demand
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::connectivity::{ConnectivityViolation, NetConnection, NetConnectivity};
    use crate::check::validity::{NetValidity, SegmentViolation, StructuralViolation};
    use crate::grid::LayerCongestion;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn invalid_report() -> ValidityReport {
        let errors = (0..3)
            .map(|segment| SegmentViolation {
                segment,
                violation: StructuralViolation::WrongArity { found: 4 },
            })
            .collect();
        ValidityReport {
            all_valid: false,
            invalid_nets: vec!["bad".to_string()],
            nets: vec![
                NetValidity {
                    name: "good".to_string(),
                    num_segments: 1,
                    errors: Vec::new(),
                },
                NetValidity {
                    name: "bad".to_string(),
                    num_segments: 3,
                    errors,
                },
            ],
        }
    }

    #[test]
    fn validity_lists_only_invalid_nets() {
        let text = render(|out| write_validity(out, &invalid_report(), 0));
        assert!(text.contains("FAIL: 1 net(s) have invalid routes:"));
        assert!(text.contains("  Net: bad"));
        assert!(!text.contains("good"));
        assert_eq!(text.matches("expected 6 values, got 4").count(), 3);
    }

    #[test]
    fn validity_error_list_can_be_capped() {
        let text = render(|out| write_validity(out, &invalid_report(), 2));
        assert_eq!(text.matches("    - Segment").count(), 2);
        assert!(text.contains("... and 1 more"));
    }

    #[test]
    fn connectivity_prints_reasons() {
        let report = ConnectivityReport {
            all_connected: false,
            disconnected_nets: vec!["n1".to_string()],
            nets: vec![
                NetConnectivity {
                    name: "n0".to_string(),
                    status: NetConnection::Connected { num_segments: 2 },
                },
                NetConnectivity {
                    name: "n1".to_string(),
                    status: NetConnection::Disconnected(ConnectivityViolation::ChainBroken {
                        index: 4,
                        next: 5,
                    }),
                },
            ],
        };
        let text = render(|out| write_connectivity(out, &report));
        assert!(text.contains("  - n1: segments 4 and 5 not connected"));
        assert!(!text.contains("n0"));
    }

    #[test]
    fn evaluation_section_lists_costs_and_layers() {
        let result = Evaluation {
            overflow: 2,
            total_cost: 23,
            wirelength_cost: 13,
            via_cost: 10,
            num_vias: 1,
            wirelength: 13,
            layers: vec![LayerCongestion {
                name: "M1".to_string(),
                overflow: 2,
                overflowed_cells: 1,
                max_demand: 3,
            }],
        };
        let text = render(|out| write_evaluation(out, &result, true));
        assert!(text.contains("Total Overflow: 2"));
        assert!(text.contains("Total Cost: 23"));
        assert!(text.contains("Via Cost: 10 (1 vias)"));
        assert!(text.contains("M1: overflow 2, overflowed GCells 1, max demand 3"));

        let text = render(|out| write_evaluation(out, &result, false));
        assert!(!text.contains("M1"));
    }
}
