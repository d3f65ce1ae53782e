//! Fixed-size partitioning of ordered id lists

use crate::utils::error::{PlayError, Result};

/// Split `items` into consecutive chunks of `size`; only the last may be shorter.
///
/// Concatenating the chunks yields `items` unchanged. An empty input gives no
/// chunks. A zero `size` is rejected.
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Result<Vec<Vec<T>>> {
    if size == 0 {
        return Err(PlayError::validation("Chunk size must be greater than 0"));
    }
    Ok(items.chunks(size).map(<[T]>::to_vec).collect())
}

/// Number of chunks `chunk` would produce for `len` items
pub fn chunk_count(len: usize, size: usize) -> usize {
    if size == 0 { 0 } else { len.div_ceil(size) }
}
