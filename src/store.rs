//! The `ZipVec` container: an append-only list of shards.
//!
//! Values are appended one at a time. The first value of each shard is
//! encoded raw; every later value in the same shard is encoded as the delta
//! against that first value, which keeps encodings short for clustered or
//! monotonic input. Random access maps an index straight to its shard and
//! finishes with a bounded walk over the shard's length tags.

use std::fmt;

use crate::scanner::Scanner;
use crate::shard::Shard;
use crate::varint::{self, Varint};
use crate::SHARD_SIZE;

/// Number of shard slots reserved at a time once the slot list is exhausted.
/// Purely a growth-tuning knob; raising it trades memory for fewer
/// reallocations when loading large datasets.
const SHARD_SLOT_BATCH: usize = 128;

/// Bookkeeping bytes charged per shard slot in the footprint estimate,
/// modelling the slot's pointer-and-length overhead.
const SLOT_OVERHEAD_BYTES: usize = 16;

/// Errors returned by [`ZipVec`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The value (or the shard-local delta it reduces to) cannot be
    /// represented by the codec.
    #[error(transparent)]
    ValueTooLarge(#[from] varint::Error),

    /// An index or range reached past the end of the container.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index (for scans, the end of the requested range).
        index: usize,
        /// The container's logical length at the time of the call.
        len: usize,
    },
}

/// Compressed append-only container for `i64` values.
///
/// See the crate-level docs for the storage layout. All operations run on
/// the calling thread; `try_push` takes `&mut self` while `get` and `scan`
/// borrow immutably, so readers can never observe a mutation in progress.
#[derive(Default)]
pub struct ZipVec {
    /// Shard list. Only the last shard is open; all earlier shards are
    /// sealed and never touched again.
    shards: Vec<Shard>,
    /// Logical element count.
    len: usize,
}

impl ZipVec {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty container pre-sized for `expected` elements, so the
    /// shard-slot list does not have to grow while loading them.
    pub fn with_capacity(expected: usize) -> Self {
        Self {
            shards: Vec::with_capacity(expected / SHARD_SIZE + 1),
            len: 0,
        }
    }

    /// Appends a value.
    ///
    /// The value is stored raw if it starts a shard, otherwise as the delta
    /// against the open shard's first value.
    ///
    /// ## Errors
    /// [`Error::ValueTooLarge`] if the value's magnitude (or, for a non-first
    /// value, the delta's magnitude) is at or above
    /// [`MAGNITUDE_LIMIT`](crate::MAGNITUDE_LIMIT). A rejected push leaves
    /// the container untouched.
    pub fn try_push(&mut self, value: i64) -> Result<(), Error> {
        let fill = self.open_shard_fill();

        // Decide the stored form first: a full shard means this value opens
        // a fresh shard and is stored raw, same as the very first push.
        let stored = match self.shards.last() {
            Some(shard) if fill < SHARD_SIZE => value - shard.first_value(),
            _ => value,
        };

        // Encode before mutating anything, so a rejected value leaves no
        // trace: no sealed shard, no new slot, no partial write.
        let encoded = Varint::encode(stored)?;

        if fill == SHARD_SIZE {
            let sealed = self.shards.len() - 1;
            self.shards[sealed].seal();
            tracing::trace!(
                "sealed shard {} at {} bytes",
                sealed,
                self.shards[sealed].bytes().len()
            );
        }

        if self.shards.is_empty() || fill == SHARD_SIZE {
            if self.shards.len() == self.shards.capacity() {
                self.shards.reserve(SHARD_SLOT_BATCH);
                tracing::trace!("grew shard slot list to {} slots", self.shards.capacity());
            }
            self.shards.push(Shard::open());
        }

        let open = self.shards.len() - 1;
        self.shards[open].push_entry(encoded.as_slice());
        self.len += 1;

        Ok(())
    }

    /// Returns the value at `index`.
    ///
    /// Cost is O(1) to find the shard plus a walk over at most 63 length
    /// tags inside it, a deliberate trade of lookup constant-factor for
    /// compression.
    ///
    /// ## Errors
    /// [`Error::IndexOutOfRange`] if `index >= self.len()`.
    pub fn get(&self, index: usize) -> Result<i64, Error> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange { index, len: self.len });
        }

        let shard = &self.shards[index / SHARD_SIZE];
        Ok(shard.value_at(index % SHARD_SIZE))
    }

    /// Number of values stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no values have been stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of shards allocated so far (sealed plus the open one).
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Approximate resident size in bytes: every shard buffer at its
    /// allocated size (the open shard counts at full capacity, sealed shards
    /// at their trimmed size) plus a fixed bookkeeping charge for every
    /// shard slot, used or not.
    pub fn memory_footprint(&self) -> usize {
        let buffers: usize = self.shards.iter().map(Shard::allocated_bytes).sum();
        buffers + SLOT_OVERHEAD_BYTES * self.shards.capacity()
    }

    /// Creates a forward-only scanner over `count` values starting at
    /// `start`.
    ///
    /// Each step of the scanner is amortized O(1), so scanning a range is
    /// strictly cheaper than calling [`get`](Self::get) per index.
    ///
    /// ## Errors
    /// [`Error::IndexOutOfRange`] if `start + count` reaches past the end.
    /// `count == 0` is always valid, even on an empty container.
    pub fn scan(&self, start: usize, count: usize) -> Result<Scanner<'_>, Error> {
        match start.checked_add(count) {
            Some(end) if end <= self.len => Ok(Scanner::new(self, start, count)),
            _ => Err(Error::IndexOutOfRange {
                index: start.saturating_add(count),
                len: self.len,
            }),
        }
    }

    /// Scans the entire container from the first value to the last.
    pub fn iter(&self) -> Scanner<'_> {
        Scanner::new(self, 0, self.len)
    }

    /// Shard accessor for the scanner.
    pub(crate) fn shard(&self, index: usize) -> &Shard {
        &self.shards[index]
    }

    /// Values currently held by the open (last) shard. Zero only while no
    /// shard exists: a shard is opened together with its first value.
    fn open_shard_fill(&self) -> usize {
        match self.shards.len() {
            0 => 0,
            n => self.len - (n - 1) * SHARD_SIZE,
        }
    }
}

impl fmt::Debug for ZipVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipVec")
            .field("len", &self.len)
            .field("shards", &self.shards.len())
            .field("footprint", &self.memory_footprint())
            .finish()
    }
}
