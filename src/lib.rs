#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

//! A forwarding table (FIB) for IPv4, answering longest-prefix-match
//! queries.
//!
//! The main data structure is a multi-bit trie with a stride length of 1, 2
//! or 3 bits per level. Prefixes whose length is not a multiple of the
//! stride are expanded over all matching positions at the next stride
//! boundary (controlled prefix expansion), and lookups walk the path of an
//! address remembering the deepest prefix seen, so the longest match wins
//! no matter at which level it is attached.
//!
//! The [rib] module builds such a trie from a route dump, keeping only the
//! route with the shortest path for each prefix.
//!
//! ```
//! use fib_trie::rib::{config::Config, RouteTableBuilder};
//! use fib_trie::Stride;
//!
//! let dump = "\
//! 10.0.0.0/8|3356 15169|A
//! 10.1.0.0/16|174|B
//! ";
//! let fib = RouteTableBuilder::new(Config::default().with_stride(Stride::Three))
//!     .build(dump.as_bytes())?;
//!
//! assert_eq!(fib.lookup_str("10.1.2.3")?.map(|h| h.as_str()), Some("B"));
//! assert_eq!(fib.lookup_str("10.2.2.3")?.map(|h| h.as_str()), Some("A"));
//! assert_eq!(fib.lookup_str("192.168.1.1")?, None);
//! # Ok::<(), fib_trie::errors::FibError>(())
//! ```
mod trie;
mod types;

#[macro_use]
mod macros;

// Public Interfaces on the root of the crate

/// Building a FIB from a route dump and running lookups against it
pub mod rib;

pub use trie::{MultiBitTrie, UpsertReport};

/// Conversion of dotted quads to and from right-aligned bit patterns
pub use types::addr::{decode, encode};

/// Prefix, record and meta data types
pub use types::{Meta, NextHop, Prefix, PrefixRecord, Stride};

/// Error types
pub use types::errors;

/// Statistics types returned by a trie
pub use types::stats;
