use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use seqsplit::config::{GraphFormat, SplitConfig};

/// The interval graph output formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputType {
    /// Output the graph in DOT format for visualization
    Dot,

    /// Output node ranges and arcs as JSON
    Json,
}

impl From<OutputType> for GraphFormat {
    fn from(value: OutputType) -> Self {
        match value {
            OutputType::Dot => GraphFormat::Dot,
            OutputType::Json => GraphFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliArgs {
    /// Set verbosity level. Use multiple times to increase the verbosity level.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<CliSubcommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliSubcommand {
    /// Align sequences and split them into an interval graph
    Msa(MsaArgs),
}

#[derive(Args, Debug)]
pub struct MsaArgs {
    /// Sequence files in FASTA format, optionally gzipped.
    #[arg(required = true)]
    #[clap(help_heading = "Inputs")]
    pub seqfiles: Vec<PathBuf>,

    /// Output filename.
    #[arg(short, long, default_value = "graph.dot")]
    #[clap(help_heading = "Outputs")]
    pub output: PathBuf,

    /// Output file type.
    #[arg(value_enum, short = 'O', long, default_value = "dot")]
    #[clap(help_heading = "Outputs")]
    pub output_type: OutputType,

    /// Minimizer k-mer size.
    #[arg(short = 'k', long, default_value_t = 25)]
    #[clap(help_heading = "Minimizers")]
    pub kmer_size: u8,

    /// Minimizer window size in bases.
    #[arg(short = 'w', long, default_value_t = 100)]
    #[clap(help_heading = "Minimizers")]
    pub window_size: u16,
}

impl MsaArgs {
    pub fn to_config(&self, verbose: bool) -> SplitConfig {
        SplitConfig {
            seqfiles: self.seqfiles.clone(),
            output_graph_file: self.output.clone(),
            output_format: self.output_type.into(),
            verbose,
            kmer_size: self.kmer_size,
            window_size: self.window_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msa_defaults() {
        let args = CliArgs::try_parse_from(["seqsplit", "msa", "a.fa", "b.fa.gz"]).unwrap();
        let Some(CliSubcommand::Msa(msa)) = args.command else {
            panic!("expected msa subcommand");
        };

        let config = msa.to_config(args.verbose > 0);
        assert_eq!(config, SplitConfig {
            seqfiles: vec!["a.fa".into(), "b.fa.gz".into()],
            ..SplitConfig::default()
        });
    }

    #[test]
    fn test_msa_options() {
        let args = CliArgs::try_parse_from(
            ["seqsplit", "-v", "msa", "-O", "json", "-o", "out.json", "-k", "15", "-w", "40", "a.fa"],
        ).unwrap();
        let Some(CliSubcommand::Msa(msa)) = args.command else {
            panic!("expected msa subcommand");
        };

        let config = msa.to_config(args.verbose > 0);
        assert!(config.verbose);
        assert_eq!(config.output_format, GraphFormat::Json);
        assert_eq!(config.kmer_size, 15);
        assert_eq!(config.window_size, 40);
        assert_eq!(config.output_graph_file, PathBuf::from("out.json"));
    }

    #[test]
    fn test_msa_requires_files() {
        assert!(CliArgs::try_parse_from(["seqsplit", "msa"]).is_err());
    }
}
