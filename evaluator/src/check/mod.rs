pub mod connectivity;
pub mod validity;

pub use connectivity::{ConnectivityReport, ConnectivityViolation, check_connectivity};
pub use validity::{StructuralViolation, ValidityReport, check_validity};
