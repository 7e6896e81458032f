use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::types::addr::{self, BITS};
use crate::types::errors::FibError;

//------------ Meta ----------------------------------------------------------

/// Trait for the data that is attached to a prefix in the trie, typically a
/// next hop.
///
/// Meta data is cloned into every trie position a prefix is replicated to,
/// so it should be cheap to clone.
pub trait Meta: Clone + fmt::Debug + fmt::Display {}

impl<T: Clone + fmt::Debug + fmt::Display> Meta for T {}

//------------ NextHop -------------------------------------------------------

/// The next-hop token of a route, as it appears in the route file.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NextHop(Arc<str>);

impl NextHop {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NextHop {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for NextHop {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl AsRef<str> for NextHop {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NextHop {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for NextHop {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for NextHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//------------ Prefix --------------------------------------------------------

/// An IPv4 prefix as a right-aligned bit pattern.
///
/// The `len` low-order bits of `bits` are the prefix, the most significant
/// address bit sitting at position `len - 1`. Any bits above `len` are
/// cleared on construction, so two prefixes covering the same addresses
/// always compare equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Prefix {
    bits: u32,
    len: u8,
}

impl Prefix {
    /// Create a prefix from a right-aligned pattern, as returned by
    /// [encode](crate::encode).
    pub fn new(bits: u32, len: u8) -> Result<Self, FibError> {
        if len > BITS {
            return Err(FibError::PrefixLengthInvalid(len));
        }
        Ok(Self {
            bits: addr::truncate_to_len(bits, len),
            len,
        })
    }

    /// Create a prefix from a dotted quad and a length.
    pub fn from_dotted(dotted_quad: &str, len: u8) -> Result<Self, FibError> {
        Self::new(addr::encode(dotted_quad, len)?, len)
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the full address `addr` falls within this prefix.
    pub fn contains(&self, addr: u32) -> bool {
        addr.checked_shr((BITS - self.len) as u32).unwrap_or(0) == self.bits
    }

    pub fn network(&self) -> std::net::Ipv4Addr {
        addr::decode(self.bits, self.len)
    }
}

impl FromStr for Prefix {
    type Err = FibError;

    /// Parse a prefix key in the `a.b.c.d/len` form used by route files.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (net, len) = s.split_once('/').ok_or_else(|| {
            FibError::MalformedRoute {
                line: 0,
                reason: format!("prefix {:?} has no /<LEN> part", s),
            }
        })?;
        let len: u8 = len.parse().map_err(|_| FibError::MalformedRoute {
            line: 0,
            reason: format!("can't parse prefix length {:?}", len),
        })?;
        Self::from_dotted(net, len)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.len)
    }
}

//------------ PrefixRecord --------------------------------------------------

/// A prefix together with its meta data, as stored in a trie node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixRecord<M: Meta> {
    pub prefix: Prefix,
    pub meta: M,
}

impl<M: Meta> PrefixRecord<M> {
    pub fn new(prefix: Prefix, meta: M) -> Self {
        Self { prefix, meta }
    }
}

impl<M: Meta> fmt::Display for PrefixRecord<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.prefix, self.meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_bits_are_cleared() -> Result<(), FibError> {
        let a = Prefix::new(0xffff_ffff, 8)?;
        let b = Prefix::new(0xff, 8)?;
        assert_eq!(a, b);
        assert_eq!(a.bits(), 0xff);
        assert_eq!(Prefix::new(0xdead, 0)?.bits(), 0);
        Ok(())
    }

    #[test]
    fn parse_prefix_key() -> Result<(), FibError> {
        let pfx: Prefix = "172.16.0.0/12".parse()?;
        assert_eq!(pfx.len(), 12);
        assert_eq!(pfx.bits(), 0xac1);
        assert_eq!(pfx.to_string(), "172.16.0.0/12");

        // host bits are don't-care
        let pfx: Prefix = "10.1.2.3/8".parse()?;
        assert_eq!(pfx.to_string(), "10.0.0.0/8");
        Ok(())
    }

    #[test]
    fn reject_bad_keys() {
        assert!(matches!(
            "10.0.0.0".parse::<Prefix>(),
            Err(FibError::MalformedRoute { .. })
        ));
        assert!(matches!(
            "10.0.0.0/x".parse::<Prefix>(),
            Err(FibError::MalformedRoute { .. })
        ));
        assert_eq!(
            "10.0.0/8".parse::<Prefix>(),
            Err(FibError::MalformedAddress("10.0.0".to_string()))
        );
        assert_eq!(
            "10.0.0.0/33".parse::<Prefix>(),
            Err(FibError::PrefixLengthInvalid(33))
        );
    }

    #[test]
    fn contains_addr() -> Result<(), FibError> {
        let pfx: Prefix = "10.0.0.0/8".parse()?;
        assert!(pfx.contains(addr::encode("10.200.1.1", 32)?));
        assert!(!pfx.contains(addr::encode("11.0.0.1", 32)?));
        let default: Prefix = "0.0.0.0/0".parse()?;
        assert!(default.contains(u32::MAX));
        Ok(())
    }
}
