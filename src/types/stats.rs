//------------ Types for Statistics -----------------------------------------

use std::fmt::{self, Debug, Display};

use serde_derive::Serialize;

use crate::types::Stride;

#[cfg(feature = "cli")]
use ansi_term::Colour;

#[derive(Copy, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedNodes {
    pub depth_level: u8,
    pub count: usize,
}

impl Debug for CreatedNodes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_fmt(format_args!("/{}: {}", &self.depth_level, &self.count))
    }
}

//------------ Counters -----------------------------------------------------
//
// This is the struct that's part of the data structure of the trie. Nodes
// and prefixes are counted per level, the totals are sums over the levels.
// Counters only ever go up: nothing is removed from a trie.

#[derive(Debug, Clone)]
pub(crate) struct Counters {
    // created nodes per level, the root included at level 0.
    nodes: Vec<usize>,
    // nodes per level that have a prefix attached.
    prefixes: Vec<usize>,
}

impl Counters {
    pub fn new(stride: Stride) -> Self {
        let levels = stride.levels() as usize + 1;
        Self {
            nodes: vec![0; levels],
            prefixes: vec![0; levels],
        }
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.iter().sum()
    }

    pub fn inc_nodes_count(&mut self, level: u8) {
        if let Some(n) = self.nodes.get_mut(level as usize) {
            *n += 1;
        }
    }

    pub fn prefixes_count(&self) -> usize {
        self.prefixes.iter().sum()
    }

    pub fn inc_prefixes_count(&mut self, level: u8) {
        if let Some(p) = self.prefixes.get_mut(level as usize) {
            *p += 1;
        }
    }

    fn per_level(counts: &[usize]) -> Vec<CreatedNodes> {
        counts
            .iter()
            .enumerate()
            .map(|(level, count)| CreatedNodes {
                depth_level: level as u8,
                count: *count,
            })
            .collect()
    }

    pub fn node_stats(&self) -> Vec<CreatedNodes> {
        Self::per_level(&self.nodes)
    }

    pub fn prefix_stats(&self) -> Vec<CreatedNodes> {
        Self::per_level(&self.prefixes)
    }
}

//------------ TrieStats -----------------------------------------------------

/// A snapshot of the counters of a trie, returned by
/// [MultiBitTrie::stats](crate::MultiBitTrie::stats).
///
/// Prefixes are counted once per node they are attached to, so a prefix
/// that was replicated over several sibling positions counts more than
/// once. This is the number that differs between stride lengths.
#[derive(Clone, Debug, Serialize)]
pub struct TrieStats {
    pub stride: u8,
    pub nodes: usize,
    pub prefixes: usize,
    /// Approximate memory taken by the node arena in bytes.
    pub mem_usage: usize,
    pub created_nodes: Vec<CreatedNodes>,
    pub prefixes_num: Vec<CreatedNodes>,
}

impl TrieStats {
    pub(crate) fn new(
        stride: Stride,
        counters: &Counters,
        node_size: usize,
    ) -> Self {
        let nodes = counters.nodes_count();
        Self {
            stride: stride.bits(),
            nodes,
            prefixes: counters.prefixes_count(),
            mem_usage: nodes * node_size,
            created_nodes: counters.node_stats(),
            prefixes_num: counters.prefix_stats(),
        }
    }
}

// A histogram of nodes and prefixes per level.
impl Display for TrieStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "stride length {}", self.stride)?;
        writeln!(f, "{} nodes created", self.nodes)?;
        writeln!(f, "{} prefixes attached", self.prefixes)?;
        writeln!(f, "memory used by nodes: {}kb", self.mem_usage / 1024)?;

        let max = self
            .created_nodes
            .iter()
            .chain(self.prefixes_num.iter())
            .map(|c| c.count)
            .max()
            .unwrap_or(0)
            .max(1);
        const WIDTH: usize = 50;

        writeln!(f, "depth\t[nodes|prefixes]")?;
        for (nodes, pfxs) in self.created_nodes.iter().zip(&self.prefixes_num)
        {
            let depth = nodes.depth_level as usize * self.stride as usize;
            let node_bar = "█".repeat(bar_len(nodes.count, max, WIDTH));
            let pfx_bar = "█".repeat(bar_len(pfxs.count, max, WIDTH));

            #[cfg(feature = "cli")]
            let (node_bar, pfx_bar) = (
                Colour::Blue.paint(node_bar).to_string(),
                Colour::Green.paint(pfx_bar).to_string(),
            );

            writeln!(f, "/{}\t{} {}", depth, node_bar, nodes.count)?;
            writeln!(f, "\t{} {}", pfx_bar, pfxs.count)?;
        }
        Ok(())
    }
}

fn bar_len(count: usize, max: usize, width: usize) -> usize {
    if count == 0 {
        return 0;
    }
    (count * width / max).max(1)
}
