//! The multi-bit trie.
//!
//! Every level of the trie consumes `stride` bits of an address. A prefix
//! is attached to the node(s) at the first stride boundary at or past its
//! length. If its length is not a multiple of the stride, the prefix is
//! replicated over all sibling positions at that boundary that agree with
//! its bits, so every address covered by the prefix finds a copy of it on
//! its path. A lookup walks down the path of an address and answers with
//! the deepest prefix it passed, which is the longest matching one.
mod node;

use log::{debug, trace};

use crate::types::addr;
use crate::types::errors::FibError;
use crate::types::stats::{Counters, TrieStats};
use crate::types::{BitSpan, Meta, Prefix, PrefixRecord, Stride};

pub(crate) use node::{NodeId, TrieNode};

//------------ UpsertReport --------------------------------------------------

/// What happened to the trie on an insert.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpsertReport {
    /// Nodes created to make room for the prefix.
    pub nodes_created: usize,
    /// Positions that did not hold a prefix before and now hold this one.
    pub prefix_new: usize,
    /// Positions where a prefix of the same or a shorter length was
    /// replaced.
    pub overwritten: usize,
    /// Positions already holding a longer prefix, left untouched.
    pub skipped: usize,
}

impl UpsertReport {
    /// The number of trie positions the prefix ended up at, or would have
    /// ended up at were they not already taken by a longer prefix.
    pub fn positions(&self) -> usize {
        self.prefix_new + self.overwritten + self.skipped
    }
}

//------------ MultiBitTrie --------------------------------------------------

/// An IPv4 multi-bit trie answering longest-prefix-match queries.
///
/// Nodes are stored in an arena and are never removed. The stride is fixed
/// at creation.
///
/// ```
/// use fib_trie::{encode, MultiBitTrie, Stride};
///
/// let mut trie = MultiBitTrie::new(Stride::Two);
/// trie.insert(&"10.0.0.0/8".parse()?, "A");
/// trie.insert(&"10.1.0.0/16".parse()?, "B");
///
/// assert_eq!(trie.lookup(encode("10.1.2.3", 32)?), Some(&"B"));
/// assert_eq!(trie.lookup(encode("10.2.2.3", 32)?), Some(&"A"));
/// assert_eq!(trie.lookup(encode("192.168.1.1", 32)?), None);
/// # Ok::<(), fib_trie::errors::FibError>(())
/// ```
#[derive(Debug)]
pub struct MultiBitTrie<M: Meta> {
    stride: Stride,
    nodes: Vec<TrieNode<M>>,
    counters: Counters,
}

impl<M: Meta> MultiBitTrie<M> {
    pub fn new(stride: Stride) -> Self {
        let mut counters = Counters::new(stride);
        counters.inc_nodes_count(0);
        Self {
            stride,
            nodes: vec![TrieNode::root()],
            counters,
        }
    }

    pub fn stride(&self) -> Stride {
        self.stride
    }

    /// Insert `prefix` with `meta`.
    ///
    /// A prefix already present with the same length is overwritten. Trie
    /// positions already holding a longer prefix (which can happen where a
    /// shorter prefix gets replicated) keep it.
    pub fn insert(&mut self, prefix: &Prefix, meta: M) -> UpsertReport {
        let mut report = UpsertReport::default();
        let mut stack = vec![NodeId::ROOT];

        while let Some(cur) = stack.pop() {
            let Some(level) = self.nodes.get(cur.index()).map(|n| n.level)
            else {
                debug_assert!(false, "dangling node id {:?}", cur);
                continue;
            };

            if self.stride.depth(level) >= prefix.len() {
                self.attach(cur, prefix, &meta, &mut report);
                continue;
            }

            let depth = self.stride.depth(level + 1);
            for bs in BitSpan::spans_at_depth(
                prefix.bits(),
                prefix.len(),
                depth,
                self.stride,
            ) {
                let next = self.child_or_create(cur, bs, &mut report);
                stack.push(next);
            }
        }

        trace!("insert {} {}: {:?}", prefix, meta, report);
        report
    }

    // Put the record on the node, unless it holds a longer prefix already.
    fn attach(
        &mut self,
        id: NodeId,
        prefix: &Prefix,
        meta: &M,
        report: &mut UpsertReport,
    ) {
        let Some(node) = self.nodes.get_mut(id.index()) else {
            return;
        };
        match &node.prefix {
            None => {
                report.prefix_new += 1;
                self.counters.inc_prefixes_count(node.level);
            }
            Some(existing) if existing.prefix.len() > prefix.len() => {
                report.skipped += 1;
                return;
            }
            Some(_) => {
                report.overwritten += 1;
            }
        }
        node.prefix = Some(PrefixRecord::new(*prefix, meta.clone()));
    }

    fn child_or_create(
        &mut self,
        parent: NodeId,
        bs: BitSpan,
        report: &mut UpsertReport,
    ) -> NodeId {
        let new_id = NodeId::from_index(self.nodes.len());
        let Some(node) = self.nodes.get_mut(parent.index()) else {
            return parent;
        };
        if let Some(id) = node.child(bs) {
            return id;
        }
        let level = node.level + 1;
        let pattern = node.child_pattern(bs);
        node.set_child(bs, new_id);

        self.nodes.push(TrieNode::new(level, pattern));
        self.counters.inc_nodes_count(level);
        report.nodes_created += 1;
        new_id
    }

    /// The record of the longest prefix containing the full address
    /// `addr`, if any.
    ///
    /// Walks down the path of `addr` while remembering the last prefix seen
    /// on the way: a prefix found deeper down is always longer than one
    /// found higher up, so when the path ends, the remembered prefix is the
    /// longest match.
    pub fn longest_match(&self, addr: u32) -> Option<&PrefixRecord<M>> {
        let mut best = None;
        let mut cur = self.nodes.first();

        while let Some(node) = cur {
            if node.prefix.is_some() {
                best = node.prefix.as_ref();
            }
            if node.is_leaf() {
                break;
            }
            let bs = BitSpan::for_addr(
                addr,
                self.stride.depth(node.level + 1),
                self.stride,
            );
            cur = node.child(bs).and_then(|id| self.nodes.get(id.index()));
        }

        trace!(
            "lookup {}: {}",
            addr::decode(addr, addr::BITS),
            best.map(|r| r.to_string()).unwrap_or_else(|| "-".into())
        );
        best
    }

    /// The meta data (next hop) of the longest prefix containing `addr`, or
    /// `None` if no prefix matches.
    pub fn lookup(&self, addr: u32) -> Option<&M> {
        self.longest_match(addr).map(|r| &r.meta)
    }

    /// Like [lookup](Self::lookup), for an address in dotted quad notation.
    pub fn lookup_str(&self, dotted_quad: &str) -> Result<Option<&M>, FibError> {
        let addr = addr::encode(dotted_quad, addr::BITS)?;
        Ok(self.lookup(addr))
    }

    /// Total number of nodes, the root included.
    pub fn nodes_count(&self) -> usize {
        self.counters.nodes_count()
    }

    /// Number of nodes that have a prefix attached.
    pub fn prefixes_count(&self) -> usize {
        self.counters.prefixes_count()
    }

    pub fn stats(&self) -> TrieStats {
        let stats = TrieStats::new(
            self.stride,
            &self.counters,
            std::mem::size_of::<TrieNode<M>>(),
        );
        debug!("{:?}", stats);
        stats
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::panic)]
mod tests {
    use super::*;

    fn pfx(s: &str) -> Prefix {
        s.parse().unwrap_or_else(|e| panic!("{}: {}", s, e))
    }

    fn ip(s: &str) -> u32 {
        addr::encode(s, 32).unwrap_or_else(|e| panic!("{}: {}", s, e))
    }

    #[test]
    fn empty_trie_has_only_root() {
        let trie = MultiBitTrie::<&str>::new(Stride::Three);
        assert_eq!(trie.nodes_count(), 1);
        assert_eq!(trie.prefixes_count(), 0);
        assert_eq!(trie.lookup(ip("1.2.3.4")), None);
    }

    #[test]
    fn default_route_sits_on_root() {
        for stride in Stride::ALL {
            let mut trie = MultiBitTrie::new(stride);
            let report = trie.insert(&pfx("0.0.0.0/0"), "default");
            assert_eq!(report.nodes_created, 0);
            assert_eq!(report.prefix_new, 1);
            assert_eq!(trie.nodes[0].prefix.as_ref().map(|r| r.meta), Some("default"));
            assert_eq!(trie.lookup(ip("200.1.1.1")), Some(&"default"));
        }
    }

    #[test]
    fn non_aligned_prefix_is_replicated() {
        // a /1 with stride 3 ends up on the 4 level-1 nodes 100..111
        let mut trie = MultiBitTrie::new(Stride::Three);
        let report = trie.insert(&pfx("128.0.0.0/1"), "upper");
        assert_eq!(report.nodes_created, 4);
        assert_eq!(report.prefix_new, 4);
        assert_eq!(trie.prefixes_count(), 4);
        assert_eq!(trie.nodes_count(), 5);

        // /2 and /3 with stride 2 land on level 1 and level 2
        let mut trie = MultiBitTrie::new(Stride::Two);
        assert_eq!(trie.insert(&pfx("64.0.0.0/2"), "a").positions(), 1);
        assert_eq!(trie.insert(&pfx("96.0.0.0/3"), "b").positions(), 2);
    }

    #[test]
    fn node_patterns_follow_path() {
        let mut trie = MultiBitTrie::new(Stride::Two);
        trie.insert(&pfx("192.0.0.0/4"), "x");
        // root -> 11 -> 1100
        assert_eq!(trie.nodes.len(), 3);
        assert_eq!((trie.nodes[1].level, trie.nodes[1].pattern), (1, 0b11));
        assert_eq!((trie.nodes[2].level, trie.nodes[2].pattern), (2, 0b1100));
    }

    #[test]
    fn same_length_overwrites() {
        let mut trie = MultiBitTrie::new(Stride::Three);
        trie.insert(&pfx("10.0.0.0/8"), "first");
        let report = trie.insert(&pfx("10.0.0.0/8"), "second");
        // a /8 sits at depth 9, on both completions of the ninth bit
        assert_eq!(report.overwritten, 2);
        assert_eq!(report.nodes_created, 0);
        assert_eq!(trie.lookup(ip("10.9.9.9")), Some(&"second"));
        assert_eq!(trie.lookup(ip("10.200.9.9")), Some(&"second"));
        assert_eq!(trie.prefixes_count(), 2);
    }

    #[test]
    fn shorter_prefix_does_not_downgrade() {
        // with stride 3, /7 and /8 both attach at depth 9: the /7 to four
        // nodes, two of which hold the /8
        let mut trie = MultiBitTrie::new(Stride::Three);
        trie.insert(&pfx("10.0.0.0/8"), "long");
        let report = trie.insert(&pfx("10.0.0.0/7"), "short");
        assert_eq!(report.skipped, 2);
        assert_eq!(report.prefix_new, 2);
        assert_eq!(trie.lookup(ip("10.0.0.1")), Some(&"long"));
        assert_eq!(trie.lookup(ip("11.0.0.1")), Some(&"short"));

        // the other order gives the same answers
        let mut trie = MultiBitTrie::new(Stride::Three);
        trie.insert(&pfx("10.0.0.0/7"), "short");
        let report = trie.insert(&pfx("10.0.0.0/8"), "long");
        assert_eq!(report.overwritten, 2);
        assert_eq!(trie.lookup(ip("10.0.0.1")), Some(&"long"));
        assert_eq!(trie.lookup(ip("11.0.0.1")), Some(&"short"));
    }

    #[test]
    fn host_routes_on_deepest_level() {
        let mut trie = MultiBitTrie::new(Stride::Three);
        let report = trie.insert(&pfx("255.255.255.255/32"), "host");
        // 11 levels, the last one replicated over the missing 33rd bit
        assert_eq!(report.nodes_created, 12);
        assert_eq!(report.prefix_new, 2);
        trie.insert(&pfx("255.255.255.254/31"), "pair");
        assert_eq!(trie.lookup(ip("255.255.255.255")), Some(&"host"));
        assert_eq!(trie.lookup(ip("255.255.255.254")), Some(&"pair"));
        assert_eq!(trie.lookup(ip("255.255.255.253")), None);
    }

    #[test]
    fn falls_back_to_shallower_prefix() {
        let mut trie = MultiBitTrie::new(Stride::One);
        trie.insert(&pfx("10.0.0.0/8"), "A");
        trie.insert(&pfx("10.1.1.0/24"), "C");
        // path continues below /8 towards /24, but diverges at bit 24
        assert_eq!(trie.lookup(ip("10.1.2.1")), Some(&"A"));
        assert_eq!(trie.lookup(ip("10.1.1.1")), Some(&"C"));
        assert_eq!(
            trie.longest_match(ip("10.1.2.1")).map(|r| r.prefix),
            Some(pfx("10.0.0.0/8"))
        );
    }

    #[test]
    fn lookup_str_rejects_garbage() {
        let trie = MultiBitTrie::<&str>::new(Stride::One);
        assert_eq!(
            trie.lookup_str("10.1.2"),
            Err(FibError::MalformedAddress("10.1.2".into()))
        );
        assert_eq!(trie.lookup_str("10.1.2.3"), Ok(None));
    }
}
