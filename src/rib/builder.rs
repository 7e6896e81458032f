use std::fmt;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::rib::config::Config;
use crate::rib::fib::Fib;
use crate::rib::route::RouteRecord;
use crate::trie::MultiBitTrie;
use crate::types::errors::{self, FibError};

//------------ BestRoutes ----------------------------------------------------

/// Reduces a stream of route records to one record per prefix key.
///
/// Records for the same prefix key must be adjacent; nothing is sorted.
/// Every maximal run of records with an identical key yields the record
/// with the shortest path, the first one seen winning a tie. A record with
/// a path of at most one token can't be beaten, so once one is held the
/// rest of the run is only consumed, not compared.
///
/// The first error from the underlying iterator is passed on; callers are
/// expected to stop there.
pub struct BestRoutes<I> {
    records: I,
    pending: Option<RouteRecord>,
    consumed: usize,
}

impl<I> BestRoutes<I>
where
    I: Iterator<Item = Result<RouteRecord, FibError>>,
{
    pub fn new(records: I) -> Self {
        Self {
            records,
            pending: None,
            consumed: 0,
        }
    }

    /// The number of records read from the underlying iterator so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    fn next_record(&mut self) -> Option<Result<RouteRecord, FibError>> {
        let rec = self.records.next();
        if let Some(Ok(_)) = rec {
            self.consumed += 1;
        }
        rec
    }
}

impl<I> Iterator for BestRoutes<I>
where
    I: Iterator<Item = Result<RouteRecord, FibError>>,
{
    type Item = Result<RouteRecord, FibError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut best = match self.pending.take() {
            Some(rec) => rec,
            None => match self.next_record()? {
                Ok(rec) => rec,
                Err(err) => return Some(Err(err)),
            },
        };

        loop {
            match self.next_record() {
                None => return Some(Ok(best)),
                Some(Err(err)) => return Some(Err(err)),
                Some(Ok(rec)) if rec.prefix_key != best.prefix_key => {
                    self.pending = Some(rec);
                    return Some(Ok(best));
                }
                Some(Ok(rec)) => {
                    if best.path_len() > 1 && rec.path_len() < best.path_len()
                    {
                        trace!("line {}: replaces line {}", rec.line, best.line);
                        best = rec;
                    } else {
                        trace!("line {}: skipped for line {}", rec.line, best.line);
                    }
                }
            }
        }
    }
}

//------------ BuildReport ---------------------------------------------------

#[derive(Clone, Copy, Debug, Default)]
pub struct BuildReport {
    /// Route records read from the input.
    pub routes_read: usize,
    /// Records that won their prefix group and went into the trie.
    pub routes_inserted: usize,
    pub duration: Duration,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read {} routes, inserted {} prefixes in {} msecs",
            self.routes_read,
            self.routes_inserted,
            self.duration.as_millis()
        )
    }
}

//------------ RouteTableBuilder ---------------------------------------------

/// Builds a [Fib] from a route dump.
///
/// The build is all-or-nothing: the first malformed line aborts it and no
/// trie is returned.
///
/// ```
/// use fib_trie::rib::{config::Config, RouteTableBuilder};
/// use fib_trie::Stride;
///
/// let dump = "\
/// 172.16.0.0/12|1 2 3|X
/// 172.16.0.0/12|4|Y
/// 172.16.0.0/12|5 6|Z
/// ";
/// let fib = RouteTableBuilder::new(Config::default().with_stride(Stride::Two))
///     .build(dump.as_bytes())?;
/// assert_eq!(fib.lookup_str("172.20.1.1")?.map(|h| h.as_str()), Some("Y"));
/// # Ok::<(), fib_trie::errors::FibError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct RouteTableBuilder {
    config: Config,
}

impl RouteTableBuilder {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build from route lines in `<prefix>/<len>|<path>|<next-hop>` form.
    /// Empty lines are ignored.
    pub fn build<R: io::Read>(&self, routes: R) -> Result<Fib, FibError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(routes);

        let records = rdr.records().map(|result| {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            RouteRecord::from_fields(record.iter(), line)
        });

        self.build_from_records(records)
    }

    /// Build from the route file at `path`.
    pub fn build_from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Fib, FibError> {
        let file = errors::open_file(path.as_ref())?;
        info!("loading routes from {}", path.as_ref().display());
        self.build(file)
    }

    /// Build from already parsed records, grouped by prefix key.
    pub fn build_from_records<I>(&self, records: I) -> Result<Fib, FibError>
    where
        I: IntoIterator<Item = Result<RouteRecord, FibError>>,
    {
        let start = Instant::now();
        let mut trie = MultiBitTrie::new(self.config.stride());
        let mut routes = BestRoutes::new(records.into_iter());
        let mut inserted = 0;

        info!("building trie with stride length {}", self.config.stride());

        while let Some(route) = routes.next() {
            let route = route?;
            let prefix = route.prefix()?;
            debug!(
                "best route for {} is line {} ({} hops) via {}",
                prefix,
                route.line,
                route.path_len(),
                route.next_hop
            );
            trie.insert(&prefix, route.next_hop);
            inserted += 1;
        }

        let report = BuildReport {
            routes_read: routes.consumed(),
            routes_inserted: inserted,
            duration: start.elapsed(),
        };
        info!(
            "{}: {} nodes, {} prefixes",
            report,
            trie.nodes_count(),
            trie.prefixes_count()
        );

        Ok(Fib::new(trie, self.config, report))
    }
}
