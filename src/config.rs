use std::path::PathBuf;

use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::errors::SplitError;
use crate::minimizer::MinimizerTokenizer;

static TRACING_DIAGNOSTICS: TracingDiagnostics = TracingDiagnostics;

/// Output formats for the interval graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GraphFormat {
    /// Graphviz DOT description
    #[default]
    Dot,

    /// JSON with node ranges and arcs
    Json,
}

/// User facing settings of a split run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    pub seqfiles: Vec<PathBuf>,
    pub output_graph_file: PathBuf,
    pub output_format: GraphFormat,
    pub verbose: bool,
    pub kmer_size: u8,
    pub window_size: u16,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            seqfiles: Vec::new(),
            output_graph_file: PathBuf::from("graph.dot"),
            output_format: GraphFormat::Dot,
            verbose: false,
            kmer_size: 25,
            window_size: 100,
        }
    }
}

impl SplitConfig {
    pub fn validate(&self) -> Result<(), SplitError> {
        if self.seqfiles.is_empty() {
            return Err(SplitError::InvalidConfig("no sequence files given".to_string()));
        }

        // Reuses the tokenizer's k-mer and window checks
        MinimizerTokenizer::new(self.kmer_size, self.window_size)?;

        Ok(())
    }
}

/// Settings for one batch of sequence files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub seqfiles: Vec<PathBuf>,
    pub output_graph_file: PathBuf,
    pub output_format: GraphFormat,
    pub verbose: bool,
    pub kmer_size: u8,
    pub window_size: u16,
}

impl From<&SplitConfig> for BatchConfig {
    fn from(c: &SplitConfig) -> Self {
        BatchConfig {
            seqfiles: c.seqfiles.clone(),
            output_graph_file: c.output_graph_file.clone(),
            output_format: c.output_format,
            verbose: c.verbose,
            kmer_size: c.kmer_size,
            window_size: c.window_size,
        }
    }
}

impl BatchConfig {
    pub fn tokenizer(&self) -> Result<MinimizerTokenizer, SplitError> {
        MinimizerTokenizer::new(self.kmer_size, self.window_size)
    }

    /// The timing sink for verbose runs
    pub fn diagnostics(&self) -> Option<&'static dyn Diagnostics> {
        self.verbose.then_some(&TRACING_DIAGNOSTICS as &dyn Diagnostics)
    }
}
