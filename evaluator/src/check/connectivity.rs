//! Checks that each 2-pin net's segment chain links its two terminals.
//!
//! The chain is taken in file order: the first and last segments must each
//! touch a terminal and every consecutive pair must share an endpoint.
//! Segments are never reordered or searched as a graph. Segment numbers are
//! record positions in the route block, the same numbering the validity
//! report uses, so a malformed line between two segments is skipped but
//! still counted.

use gr_common::db::core::{NetData, NetList, RouteSolution, Segment};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConnectivityViolation {
    #[error("expected 2 pins, got {found}")]
    PinCount { found: usize },

    #[error("no segments")]
    NoSegments,

    #[error("first segment not connected to any pin")]
    FirstSegmentUnconnected,

    #[error("segments {index} and {next} not connected")]
    ChainBroken { index: usize, next: usize },

    #[error("last segment not connected to any pin")]
    LastSegmentUnconnected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetConnection {
    /// Fewer than two declared pins; nothing to connect.
    SinglePin,
    Connected { num_segments: usize },
    Disconnected(ConnectivityViolation),
}

impl NetConnection {
    pub fn is_connected(&self) -> bool {
        !matches!(self, Self::Disconnected(_))
    }
}

impl fmt::Display for NetConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SinglePin => f.write_str("single pin"),
            Self::Connected { num_segments } => write!(f, "connected ({} segments)", num_segments),
            Self::Disconnected(reason) => write!(f, "{}", reason),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetConnectivity {
    pub name: String,
    pub status: NetConnection,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectivityReport {
    pub all_connected: bool,
    pub disconnected_nets: Vec<String>,
    /// One entry per declared net, in `.net` order.
    pub nets: Vec<NetConnectivity>,
}

impl ConnectivityReport {
    pub fn disconnected(&self) -> impl Iterator<Item = (&str, &ConnectivityViolation)> {
        self.nets.iter().filter_map(|net| match &net.status {
            NetConnection::Disconnected(reason) => Some((net.name.as_str(), reason)),
            _ => None,
        })
    }
}

pub fn check_connectivity(nets: &NetList, routes: &RouteSolution) -> ConnectivityReport {
    let routed = routes.by_name();

    let results: Vec<NetConnectivity> = nets
        .nets
        .iter()
        .map(|net| {
            let segments: Vec<(usize, Segment)> = routed
                .get(net.name.as_str())
                .map(|r| r.numbered_segments().map(|(i, seg)| (i, *seg)).collect())
                .unwrap_or_default();
            NetConnectivity {
                name: net.name.clone(),
                status: check_numbered(net, &segments),
            }
        })
        .collect();

    let disconnected_nets: Vec<String> = results
        .iter()
        .filter(|r| !r.status.is_connected())
        .map(|r| r.name.clone())
        .collect();

    if disconnected_nets.is_empty() {
        log::info!("\x1b[32mPASS\x1b[0m: All {} nets are fully connected.", results.len());
    } else {
        log::error!(
            "\x1b[31mFAIL\x1b[0m: {} net(s) are not properly connected",
            disconnected_nets.len()
        );
    }

    ConnectivityReport {
        all_connected: disconnected_nets.is_empty(),
        disconnected_nets,
        nets: results,
    }
}

/// Checks a chain of well-formed segments numbered by their slice position.
pub fn check_net(net: &NetData, segments: &[Segment]) -> NetConnection {
    let numbered: Vec<(usize, Segment)> = segments.iter().copied().enumerate().collect();
    check_numbered(net, &numbered)
}

fn check_numbered(net: &NetData, segments: &[(usize, Segment)]) -> NetConnection {
    match net.pins.len() {
        0 | 1 => return NetConnection::SinglePin,
        2 => {}
        found => return NetConnection::Disconnected(ConnectivityViolation::PinCount { found }),
    }
    match check_chain(net, segments) {
        Ok(num_segments) => NetConnection::Connected { num_segments },
        Err(reason) => NetConnection::Disconnected(reason),
    }
}

fn check_chain(net: &NetData, segments: &[(usize, Segment)]) -> Result<usize, ConnectivityViolation> {
    let Some((pin1, pin2)) = net.terminals() else {
        return Ok(segments.len());
    };
    let touches_pin = |seg: &Segment| seg.touches(pin1) || seg.touches(pin2);

    let (Some((_, first)), Some((_, last))) = (segments.first(), segments.last()) else {
        return Err(ConnectivityViolation::NoSegments);
    };

    if !touches_pin(first) {
        return Err(ConnectivityViolation::FirstSegmentUnconnected);
    }
    if let Some(pair) = segments
        .windows(2)
        .find(|pair| !pair[0].1.shares_endpoint(&pair[1].1))
    {
        return Err(ConnectivityViolation::ChainBroken {
            index: pair[0].0,
            next: pair[1].0,
        });
    }
    if !touches_pin(last) {
        return Err(ConnectivityViolation::LastSegmentUnconnected);
    }
    Ok(segments.len())
}
