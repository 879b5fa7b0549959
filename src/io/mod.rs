pub mod fasta;
pub mod graph;

pub use fasta::load_minimizer_sequences;
pub use graph::{write_dot, write_json};
