//! Registration Batching
//!
//! Splits an ordered entry list into contiguous chunks so that no single
//! registration call exceeds the registrar's operation-size ceiling.

use crate::error::CoreError;

/// Default entries per `diamondCut` call
pub const DEFAULT_MAX_BATCH_SIZE: usize = 50;

/// Split `entries` into ordered batches of at most `max_batch_size`.
///
/// Only the last batch may be shorter. An empty input yields no batches.
pub fn schedule<T>(entries: Vec<T>, max_batch_size: usize) -> Result<Vec<Vec<T>>, CoreError> {
    if max_batch_size == 0 {
        return Err(CoreError::InvalidConfiguration(
            "max batch size must be at least 1".to_string(),
        ));
    }

    let mut batches = Vec::with_capacity(entries.len().div_ceil(max_batch_size));
    let mut iter = entries.into_iter().peekable();
    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(max_batch_size).collect());
    }
    Ok(batches)
}
