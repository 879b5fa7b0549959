use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::fasta;
use tracing::{debug, info};

use crate::errors::SplitError;
use crate::minimizer::Tokenizer;
use crate::sequence::{SequenceRecord, SequenceSet};

/// Open a FASTA file, decompressing on the fly if its name ends with `.gz`.
pub fn open_sequence_file(path: &Path) -> Result<Box<dyn BufRead>, SplitError> {
    let is_gzipped = path.file_name()
        .map(|v| v.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false);

    let file = File::open(path)
        .map_err(|source| SplitError::FileReadError { path: path.to_path_buf(), source })?;

    let reader: Box<dyn BufRead> = if is_gzipped {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(reader)
}

/// Read all records from `reader`, tokenize them and append them to `sequences`.
///
/// Returns the number of records read.
pub fn load_minimizer_records<T, R>(
    sequences: &mut SequenceSet,
    tokenizer: &T,
    reader: R,
    origin: &Path,
) -> Result<usize, SplitError>
where
    T: Tokenizer,
    R: BufRead,
{
    let mut reader = fasta::io::Reader::new(reader);

    let mut loaded = 0;
    for result in reader.records() {
        let record = result?;
        let name = String::from_utf8_lossy(record.name()).into_owned();
        let raw: &[u8] = record.sequence().as_ref();

        let minimizers = tokenizer.tokenize(raw);
        debug!("{}: {} bases, {} minimizers", name, raw.len(), minimizers.len());

        sequences.push(SequenceRecord::new(name, origin, raw.len() as u32, minimizers));
        loaded += 1;
    }

    Ok(loaded)
}

/// Load and tokenize every sequence of a FASTA file.
pub fn load_minimizer_sequences<T: Tokenizer>(
    sequences: &mut SequenceSet,
    tokenizer: &T,
    path: impl AsRef<Path>,
) -> Result<usize, SplitError> {
    let path = path.as_ref();
    info!(">>> Processing file {}", path.display());

    let reader = open_sequence_file(path)?;
    load_minimizer_records(sequences, tokenizer, reader, path)
}
