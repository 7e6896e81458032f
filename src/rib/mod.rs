//! Building a forwarding table from a route dump, and querying it.
//!
//! A route dump holds one route per line, in the form
//! `<prefix>/<len>|<space separated path>|<next-hop>`. All routes for the
//! same prefix must be adjacent. The [RouteTableBuilder] keeps the route
//! with the shortest path for every prefix and inserts it into a
//! [MultiBitTrie](crate::MultiBitTrie), yielding a [Fib] that answers
//! longest-prefix-match queries.
pub mod config;

mod builder;
mod fib;
mod route;

pub use builder::{BestRoutes, BuildReport, RouteTableBuilder};
pub use fib::{Fib, LookupReport, NO_MATCH};
pub use route::RouteRecord;
