//------------ Config --------------------------------------------------------

//! Configuration options for building and querying a FIB.
//!
//! A configuration is created with `Config::default()`, adjusted with the
//! setters, and handed to a [RouteTableBuilder](super::RouteTableBuilder).
//!
//! ```
//! use fib_trie::rib::config::{Config, Verbosity};
//! use fib_trie::Stride;
//!
//! let config = Config::default()
//!     .with_stride(Stride::Three)
//!     .with_verbosity(Verbosity::Quiet);
//! assert_eq!(config.stride(), Stride::Three);
//! ```

use crate::types::Stride;

/// Whether the lookup driver writes a line per query.
///
/// Diagnostics go through the `log` facade and are filtered by the logger
/// the application installs. This setting only concerns the per-query
/// output, which a caller timing lookups may want to leave out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Resolve queries, but don't write results.
    Quiet,
    /// Write one `<ip>  <next-hop>` line per query.
    #[default]
    Normal,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    stride: Stride,
    verbosity: Verbosity,
}

impl Config {
    pub fn new(stride: Stride, verbosity: Verbosity) -> Self {
        Self { stride, verbosity }
    }

    pub fn stride(&self) -> Stride {
        self.stride
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn with_stride(mut self, stride: Stride) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}
