// src/plan.rs

//! Shard planning: split a chromosome's rows into equal, contiguous ranges.
//!
//! Rows are addressed 1-based. A plan of `n` shards over `threshold` rows with
//! stride `step = threshold / n` yields ranges `[1 + i*step, 1 + (i+1)*step)`
//! for `i in 0..n`, so the ranges jointly cover rows `1..=threshold`.

use tracing::debug;

use crate::errors::{GenomeDagError, Result};

/// Half-open row range `[start, stop)` handled by one shard job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShardRange {
    pub start: u64,
    pub stop: u64,
}

impl ShardRange {
    pub fn len(&self) -> u64 {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.stop <= self.start
    }
}

/// Compute the shard ranges for one chromosome.
///
/// `file` is only used to label the error.
///
/// - the shard count is clamped to `threshold` (never more shards than rows);
/// - the clamped count must divide `threshold` exactly, otherwise
///   [`GenomeDagError::Partition`] is returned;
/// - `threshold` must leave room for the exclusive end row, otherwise
///   [`GenomeDagError::RowCount`] is returned.
pub fn plan(file: &str, threshold: u64, requested_shards: u64) -> Result<Vec<ShardRange>> {
    // The last range stops at `threshold + 1`.
    if threshold.checked_add(1).is_none() {
        return Err(GenomeDagError::RowCount {
            file: file.to_string(),
            rows: threshold,
        });
    }

    let shards = requested_shards.min(threshold);
    if shards == 0 {
        return Err(GenomeDagError::Partition {
            file: file.to_string(),
            shards,
            rows: threshold,
        });
    }

    let step = threshold / shards;
    let rest = threshold % shards;
    if rest != 0 {
        return Err(GenomeDagError::Partition {
            file: file.to_string(),
            shards,
            rows: threshold,
        });
    }

    let ranges: Vec<ShardRange> = (0..shards)
        .map(|i| {
            let start = 1 + i * step;
            ShardRange {
                start,
                stop: start + step,
            }
        })
        .collect();

    debug!(
        file = %file,
        threshold,
        requested_shards,
        shards,
        step,
        "planned shard ranges"
    );

    Ok(ranges)
}
