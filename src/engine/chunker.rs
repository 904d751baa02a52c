//! Newline-aligned partitioning of the input
//!
//! The input is cut into large byte ranges of roughly `chunk_size` bytes.
//! Every boundary falls directly after a `\n`, so no record spans two
//! chunks, and the ranges cover the input exactly once and in order.

use crate::constants::NEWLINE;
use crate::error::{AggregatorError, Result};
use std::ops::Range;

/// Split `data` into newline-aligned ranges of about `chunk_size` bytes.
///
/// The boundary for each chunk is found by scanning backward from
/// `start + chunk_size` to the nearest newline. A record longer than
/// `chunk_size` has no newline in that window, so the scan continues forward
/// instead. The final chunk always runs to the end of the input.
pub fn split_chunks(data: &[u8], chunk_size: usize) -> Result<Vec<Range<usize>>> {
    if chunk_size == 0 {
        return Err(AggregatorError::configuration(
            "chunk size must be at least 1 byte",
        ));
    }

    let mut chunks = Vec::with_capacity(data.len() / chunk_size + 1);
    let mut start = 0;

    while start < data.len() {
        let naive_end = start.saturating_add(chunk_size);
        if naive_end >= data.len() {
            chunks.push(start..data.len());
            break;
        }

        let end = match memchr::memrchr(NEWLINE, &data[start..naive_end]) {
            Some(offset) => start + offset + 1,
            None => match memchr::memchr(NEWLINE, &data[naive_end..]) {
                Some(offset) => naive_end + offset + 1,
                None => data.len(),
            },
        };

        chunks.push(start..end);
        start = end;
    }

    Ok(chunks)
}
