use crate::errors::SplitError;

use super::RangeVector;

/// Merge the ranges of a node that is being swallowed (`source`) into the surviving node
/// (`target`).
///
/// ```text
///  [source] --> [target]            [target]
///   (2,10)       (10,15)     =>      (2,15)
///
///  [source] --> [target]            [target]
///   (0,0)        (10,15)     =>      (10,15)
///
///  [source] --> [target]            [target]
///   (2,10)       (0,0)       =>      (2,10)
/// ```
///
/// If both nodes hold a range for the same sequence, the source range has to end where the
/// target range starts. Anything else means the alignment graph is corrupted.
pub fn merge_properties_into(target: &mut RangeVector, source: &RangeVector) -> Result<(), SplitError> {
    assert_eq!(target.len(), source.len());

    for (idx, range) in source.iter().enumerate() {
        assert!(range.end >= range.start, "invalid range {range:?} for sequence {idx}");

        if range.is_unset() {
            continue;
        }

        let target_range = &mut target[idx];
        if target_range.is_unset() {
            target_range.end = range.end;
        } else if range.end != target_range.start {
            return Err(SplitError::CorruptedGraph {
                range_idx: idx,
                source: *range,
                target_start: target_range.start,
            });
        }

        target_range.start = range.start;
    }

    Ok(())
}
