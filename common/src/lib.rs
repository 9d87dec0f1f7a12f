//! Shared data model for global-routing evaluation: the capacity grid, the
//! declared nets, the routed segments and the parsers that build them from
//! `.cap`, `.net` and `.route` files.

pub mod db;
pub mod error;
pub mod geom;
pub mod util;
