use std::fmt::Debug;

use crate::types::{BitSpan, Meta, PrefixRecord, Stride};

/// The largest fan-out of a node, reached with a stride of 3.
pub(crate) const MAX_FAN_OUT: usize = Stride::Three.fan_out();

//------------ NodeId --------------------------------------------------------

// Index of a node in the arena of its trie. The root always has id 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

//------------ TrieNode ------------------------------------------------------

// A node knows its level and the bit pattern of the path leading to it
// (`level * stride` bits, right-aligned, one bit more than an address can
// hold at the deepest stride-3 level, hence the u64). Children are kept in
// a fixed array indexed by their local key, only the first `2^stride`
// entries are ever used.
pub(crate) struct TrieNode<M: Meta> {
    pub level: u8,
    pub pattern: u64,
    pub prefix: Option<PrefixRecord<M>>,
    children: [Option<NodeId>; MAX_FAN_OUT],
}

impl<M: Meta> Debug for TrieNode<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrieNode")
            .field("level", &self.level)
            .field("pattern", &format_args!("{:b}", self.pattern))
            .field("prefix", &self.prefix)
            .field("children", &self.children_count())
            .finish()
    }
}

impl<M: Meta> TrieNode<M> {
    pub(crate) fn root() -> Self {
        Self::new(0, 0)
    }

    pub(crate) fn new(level: u8, pattern: u64) -> Self {
        TrieNode {
            level,
            pattern,
            prefix: None,
            children: [None; MAX_FAN_OUT],
        }
    }

    // The pattern of the child at `bs`.
    pub(crate) fn child_pattern(&self, bs: BitSpan) -> u64 {
        (self.pattern << bs.len) | bs.bits as u64
    }

    pub(crate) fn child(&self, bs: BitSpan) -> Option<NodeId> {
        self.children.get(bs.into_index()).copied().flatten()
    }

    pub(crate) fn set_child(&mut self, bs: BitSpan, id: NodeId) {
        if let Some(slot) = self.children.get_mut(bs.into_index()) {
            *slot = Some(id);
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(crate) fn children_count(&self) -> usize {
        self.children.iter().filter(|c| c.is_some()).count()
    }
}
