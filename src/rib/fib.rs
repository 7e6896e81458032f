use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use log::info;

use crate::rib::builder::BuildReport;
use crate::rib::config::{Config, Verbosity};
use crate::trie::MultiBitTrie;
use crate::types::errors::{self, FibError};
use crate::types::stats::TrieStats;
use crate::types::NextHop;

/// Printed in place of a next hop for addresses without a matching prefix.
pub const NO_MATCH: &str = "no match";

//------------ LookupReport --------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LookupReport {
    pub queries: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub duration: Duration,
}

impl fmt::Display for LookupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lookups ({} matched, {} without match) in {} msecs",
            self.queries,
            self.matched,
            self.unmatched,
            self.duration.as_millis()
        )
    }
}

//------------ Fib -----------------------------------------------------------

/// A built forwarding table, ready for lookups.
///
/// A `Fib` can only be obtained from a
/// [RouteTableBuilder](super::RouteTableBuilder) and offers no way to add
/// routes, so all building happens before the first query.
#[derive(Debug)]
pub struct Fib {
    trie: MultiBitTrie<NextHop>,
    config: Config,
    report: BuildReport,
}

impl Fib {
    pub(crate) fn new(
        trie: MultiBitTrie<NextHop>,
        config: Config,
        report: BuildReport,
    ) -> Self {
        Self {
            trie,
            config,
            report,
        }
    }

    pub fn trie(&self) -> &MultiBitTrie<NextHop> {
        &self.trie
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn build_report(&self) -> &BuildReport {
        &self.report
    }

    pub fn stats(&self) -> TrieStats {
        self.trie.stats()
    }

    pub fn lookup(&self, addr: u32) -> Option<&NextHop> {
        self.trie.lookup(addr)
    }

    pub fn lookup_str(
        &self,
        dotted_quad: &str,
    ) -> Result<Option<&NextHop>, FibError> {
        self.trie.lookup_str(dotted_quad)
    }

    /// Resolve every address in `ips`, one dotted quad per line.
    ///
    /// For each address a line `<ip>  <next-hop>` is written to `out`, with
    /// [NO_MATCH] for addresses no prefix covers. With
    /// [Verbosity::Quiet] nothing is written. Blank lines are skipped, a
    /// malformed address stops the run with [FibError::MalformedAddress].
    pub fn lookup_ips<R: BufRead, W: Write>(
        &self,
        ips: R,
        out: W,
    ) -> Result<LookupReport, FibError> {
        let report = match self.config.verbosity() {
            Verbosity::Quiet => self.resolve_lines(ips, io::sink()),
            Verbosity::Normal => self.resolve_lines(ips, out),
        }?;
        info!("{}", report);
        Ok(report)
    }

    /// Like [lookup_ips](Self::lookup_ips), reading the file at `path`.
    pub fn lookup_ips_from_path<P: AsRef<Path>, W: Write>(
        &self,
        path: P,
        out: W,
    ) -> Result<LookupReport, FibError> {
        let file = errors::open_file(path.as_ref())?;
        self.lookup_ips(BufReader::new(file), out)
    }

    fn resolve_lines<R: BufRead, W: Write>(
        &self,
        ips: R,
        mut out: W,
    ) -> Result<LookupReport, FibError> {
        let start = Instant::now();
        let mut report = LookupReport::default();

        for line in ips.lines() {
            let line = line?;
            let ip = line.trim();
            if ip.is_empty() {
                continue;
            }
            let hop = self.trie.lookup_str(ip)?;
            report.queries += 1;
            match hop {
                Some(hop) => {
                    report.matched += 1;
                    writeln!(out, "{:<15}  {}", ip, hop)?;
                }
                None => {
                    report.unmatched += 1;
                    writeln!(out, "{:<15}  {}", ip, NO_MATCH)?;
                }
            }
        }
        out.flush()?;

        report.duration = start.elapsed();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rib::RouteTableBuilder;
    use crate::types::Stride;

    const ROUTES: &str = "\
10.0.0.0/8|1 2|A
10.1.0.0/16|3|B
";

    fn fib(verbosity: Verbosity) -> Result<Fib, FibError> {
        RouteTableBuilder::new(Config::new(Stride::Three, verbosity))
            .build(ROUTES.as_bytes())
    }

    #[test]
    fn writes_one_line_per_query() -> Result<(), FibError> {
        let mut out = vec![];
        let report = fib(Verbosity::Normal)?
            .lookup_ips("10.1.2.3\n\n  10.2.2.3 \n192.168.1.1\n".as_bytes(), &mut out)?;
        let expected: String = [
            ("10.1.2.3", "B"),
            ("10.2.2.3", "A"),
            ("192.168.1.1", NO_MATCH),
        ]
        .iter()
        .map(|(ip, hop)| format!("{:<15}  {}\n", ip, hop))
        .collect();
        assert_eq!(String::from_utf8_lossy(&out), expected);
        assert!(expected.starts_with("10.1.2.3         B\n"));
        assert_eq!((report.queries, report.matched, report.unmatched), (3, 2, 1));
        Ok(())
    }

    #[test]
    fn quiet_writes_nothing() -> Result<(), FibError> {
        let mut out = vec![];
        let report =
            fib(Verbosity::Quiet)?.lookup_ips("10.1.2.3\n".as_bytes(), &mut out)?;
        assert!(out.is_empty());
        assert_eq!(report.matched, 1);
        Ok(())
    }

    #[test]
    fn malformed_query_stops_run() -> Result<(), FibError> {
        let mut out = vec![];
        let res = fib(Verbosity::Normal)?
            .lookup_ips("10.1.2.3\nnot-an-ip\n10.2.2.3\n".as_bytes(), &mut out);
        assert_eq!(res, Err(FibError::MalformedAddress("not-an-ip".into())));
        Ok(())
    }

    #[test]
    fn missing_query_file() -> Result<(), FibError> {
        let res = fib(Verbosity::Normal)?
            .lookup_ips_from_path("/no/such/ips.txt", io::sink());
        assert_eq!(res, Err(FibError::FileNotFound("/no/such/ips.txt".into())));
        Ok(())
    }
}
