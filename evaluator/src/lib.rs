pub mod check;
pub mod evaluate;
pub mod grid;
pub mod report;

use check::{ConnectivityReport, ValidityReport, check_connectivity, check_validity};
use evaluate::{Evaluation, evaluate};
use gr_common::db::core::{CapacityGrid, NetList, RouteSolution};
use gr_common::util::config::Config;

/// Results of the three independent passes over one parsed design.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub validity: ValidityReport,
    pub connectivity: ConnectivityReport,
    pub evaluation: Evaluation,
}

impl Analysis {
    /// True when every routed net is well formed and every net is connected.
    pub fn passed(&self) -> bool {
        self.validity.all_valid && self.connectivity.all_connected
    }
}

pub fn run_checks(
    cap: &CapacityGrid,
    nets: &NetList,
    routes: &RouteSolution,
    config: &Config,
) -> Analysis {
    let ((validity, connectivity), evaluation) = if config.checks.parallel {
        rayon::join(
            || rayon::join(|| check_validity(cap, routes), || check_connectivity(nets, routes)),
            || evaluate(cap, routes, &config.evaluation),
        )
    } else {
        (
            (check_validity(cap, routes), check_connectivity(nets, routes)),
            evaluate(cap, routes, &config.evaluation),
        )
    };

    Analysis {
        validity,
        connectivity,
        evaluation,
    }
}
