//! Splitting decoded input into per-worker chunks.

use std::fmt;
use std::num::NonZeroUsize;

/// Number of records handed to one worker.
///
/// Always at least one. Requested sizes below one are clamped rather than
/// rejected, so a zero or negative value means one record per worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkSize(NonZeroUsize);

impl ChunkSize {
    /// Chunk size used when none is configured.
    pub const DEFAULT: Self = match NonZeroUsize::new(2024) {
        Some(size) => Self(size),
        None => Self(NonZeroUsize::MIN),
    };

    /// Clamp `requested` to at least one.
    #[must_use]
    pub fn new(requested: i64) -> Self {
        usize::try_from(requested)
            .ok()
            .and_then(NonZeroUsize::new)
            .map_or(Self(NonZeroUsize::MIN), Self)
    }

    /// The size as a plain count.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<NonZeroUsize> for ChunkSize {
    fn from(size: NonZeroUsize) -> Self {
        Self(size)
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Partition `items` into contiguous chunks of `size`, preserving order.
///
/// Every chunk is full except possibly the last, so there are
/// `ceil(len / size)` chunks and none for empty input.
#[must_use]
pub fn to_chunks<T>(items: Vec<T>, size: ChunkSize) -> Vec<Vec<T>> {
    let size = size.get();
    let mut chunks = Vec::with_capacity(items.len().div_ceil(size));
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        chunks.push(items.by_ref().take(size).collect());
    }
    chunks
}
