use std::fmt;

use crate::types::addr::BITS;
use crate::types::errors::FibError;

//------------ Stride --------------------------------------------------------

/// The number of address bits consumed per trie level.
///
/// The stride is fixed for the lifetime of a trie. Larger strides mean fewer
/// levels (and thus shorter lookups), at the cost of replicating prefixes
/// that do not end on a stride boundary.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Stride {
    #[default]
    One,
    Two,
    Three,
}

impl Stride {
    pub const ALL: [Stride; 3] = [Stride::One, Stride::Two, Stride::Three];

    /// Number of bits per level.
    pub const fn bits(self) -> u8 {
        match self {
            Stride::One => 1,
            Stride::Two => 2,
            Stride::Three => 3,
        }
    }

    /// The maximum number of children of a single node.
    pub const fn fan_out(self) -> usize {
        1 << self.bits()
    }

    /// Number of levels below the root needed to cover all 32 bits. For a
    /// stride of 3 this is 11, so the deepest level sits at bit depth 33.
    pub const fn levels(self) -> u8 {
        BITS.div_ceil(self.bits())
    }

    /// The bit depth of nodes at `level`.
    pub const fn depth(self, level: u8) -> u8 {
        level * self.bits()
    }
}

impl TryFrom<u8> for Stride {
    type Error = FibError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Stride::One),
            2 => Ok(Stride::Two),
            3 => Ok(Stride::Three),
            s => Err(FibError::InvalidStride(s)),
        }
    }
}

impl fmt::Display for Stride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_cover_all_bits() {
        assert_eq!(Stride::One.levels(), 32);
        assert_eq!(Stride::Two.levels(), 16);
        assert_eq!(Stride::Three.levels(), 11);
        assert_eq!(Stride::Three.depth(Stride::Three.levels()), 33);
    }

    #[test]
    fn only_small_strides() {
        assert_eq!(Stride::try_from(2), Ok(Stride::Two));
        assert_eq!(Stride::try_from(0), Err(FibError::InvalidStride(0)));
        assert_eq!(Stride::try_from(4), Err(FibError::InvalidStride(4)));
    }
}
