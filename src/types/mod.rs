pub(crate) mod addr;
pub(crate) mod bit_span;
pub(crate) mod prefix_record;
pub(crate) mod stride;

pub(crate) use bit_span::BitSpan;
pub use prefix_record::{Meta, NextHop, Prefix, PrefixRecord};
pub use stride::Stride;

pub mod errors;
pub mod stats;
