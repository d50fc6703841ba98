//! Resource definitions grouped by the schema they live in: HR, portfolio and
//! procurement. Each resource pairs a `Table` descriptor with its row and payload types.

pub mod hr;
pub mod portfolio;
pub mod procure;
