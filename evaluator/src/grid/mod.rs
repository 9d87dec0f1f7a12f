pub mod dense;

pub use dense::{DemandGrid, LayerCongestion};
