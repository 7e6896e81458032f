use crate::types::Stride;

//------------ BitSpan -------------------------------------------------------

// A bitspan is the local key of a child node: the last `len` (= stride)
// bits of the path from the root to that child. It indexes the children
// array of its parent directly.
//
// Calculations are done in u64, since with a stride of 3 the deepest level
// lives at bit depth 33, which is one bit more than the pattern of a full
// IPv4 address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitSpan {
    pub bits: u32,
    pub len: u8,
}

impl BitSpan {
    pub(crate) fn new(bits: u32, len: u8) -> Self {
        Self { bits, len }
    }

    // The spans at bit depth `depth` that are consistent with the
    // right-aligned pattern `bits` of length `len`.
    //
    // If `len >= depth` that is just the one span made up of the top `depth`
    // bits of the pattern. Otherwise every completion of the missing
    // `depth - len` low-order bits is a candidate, and since that gap is
    // always smaller than the stride, the candidates form a contiguous run
    // of local keys.
    pub(crate) fn spans_at_depth(
        bits: u32,
        len: u8,
        depth: u8,
        stride: Stride,
    ) -> BitSpanIter {
        let mask = (1_u64 << stride.bits()) - 1;
        let (first, count) = if len >= depth {
            (((bits as u64) >> (len - depth)) & mask, 1)
        } else {
            let gap = depth - len;
            debug_assert!(gap < stride.bits());
            (((bits as u64) << gap) & mask, 1_u64 << gap)
        };
        BitSpanIter {
            next: first,
            end: first + count,
            len: stride.bits(),
        }
    }

    // The single span a full address takes at `depth`. Bits past the end of
    // the address count as zero.
    pub(crate) fn for_addr(addr: u32, depth: u8, stride: Stride) -> Self {
        let mask = (1_u64 << stride.bits()) - 1;
        let bits = if depth <= 32 {
            ((addr as u64) >> (32 - depth)) & mask
        } else {
            ((addr as u64) << (depth - 32)) & mask
        };
        Self::new(bits as u32, stride.bits())
    }

    pub(crate) fn into_index(self) -> usize {
        self.bits as usize
    }
}

impl std::fmt::Binary for BitSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0width$b} (len {})", self.bits, self.len, width = self.len as usize)
    }
}

pub(crate) struct BitSpanIter {
    next: u64,
    end: u64,
    len: u8,
}

impl Iterator for BitSpanIter {
    type Item = BitSpan;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let bs = BitSpan::new(self.next as u32, self.len);
        self.next += 1;
        Some(bs)
    }
}
