pub mod errors;
pub mod config;
pub mod diagnostics;
pub mod sequence;
pub mod minimizer;
pub mod distance;
pub mod matches;
pub mod msa;
pub mod interval;
pub mod io;
pub mod split;

pub use config::{BatchConfig, GraphFormat, SplitConfig};
pub use errors::SplitError;
pub use interval::IntervalGraph;
pub use split::{build_interval_graph, run_batch};
