#![deny(missing_docs)]

//! # ZipVec: Compressed Append-Only Integer Storage
//!
//! `zipvec` is a compact, random-access container for `i64` values. Every
//! value is stored with a variable-length encoding, and within each fixed-size
//! shard of 64 values, all values after the first are stored as deltas from
//! the shard's first value. For locally clustered or monotonic data (sorted
//! identifier lists are the motivating workload) this cuts the resident size
//! to a fraction of a plain `Vec<i64>` while keeping lookups bounded and
//! sequential scans cheap.
//!
//! ## Usage Example
//!
//! ```
//! use zipvec::ZipVec;
//!
//! let mut ids = ZipVec::new();
//! for id in [100_i64, 105, 110, 250_000] {
//!     ids.try_push(id).unwrap();
//! }
//!
//! assert_eq!(ids.len(), 4);
//! assert_eq!(ids.get(2).unwrap(), 110);
//!
//! let tail: Vec<i64> = ids.scan(1, 3).unwrap().collect();
//! assert_eq!(tail, [105, 110, 250_000]);
//! ```
//!
//! ## Architecture
//!
//! * **Varint**: Low-level codec with a 3-bit length and 1-bit sign tag
//! * **Shard**: Fixed-logical-capacity buffer of encoded values
//! * **ZipVec**: Owns the shard list; append, random access, footprint
//! * **Scanner**: Forward-only cursor with amortized O(1) steps
//!
//! The container is append-only and single-threaded by design: `try_push`
//! takes `&mut self` while readers and scanners borrow immutably, so the
//! borrow checker rules out reads overlapping a mutation.

mod scanner;
mod shard;
mod store;
mod varint;


pub use scanner::Scanner;

pub use store::Error as StoreError;
pub use store::ZipVec;

pub use varint::Encoded;
pub use varint::Error as VarintError;
pub use varint::Varint;
pub use varint::MAGNITUDE_LIMIT;

/// Number of logical values held by one shard. The first value of a shard is
/// stored raw and acts as the delta base for the remaining 63.
pub const SHARD_SIZE: usize = 64;
