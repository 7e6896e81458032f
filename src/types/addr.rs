//------------ Address Codec -------------------------------------------------
//
// IPv4 addresses and prefixes travel through the crate as right-aligned
// bit patterns: a prefix of length `len` occupies the `len` low-order bits
// of a u32, with the most significant address bit kept at position
// `len - 1`. A full address is simply the pattern of length 32.

use std::net::Ipv4Addr;

use crate::types::errors::FibError;

/// The number of bits in an IPv4 address.
pub const BITS: u8 = 32;

/// Encode a dotted quad into the `len` most significant bits of the
/// address, right-aligned.
///
/// The input must be exactly four `.`-separated decimal octets (0-255).
/// `len == 32` returns the full address, `len == 0` returns zero.
///
/// ```
/// use fib_trie::encode;
///
/// assert_eq!(encode("10.1.2.3", 8), Ok(10));
/// assert_eq!(encode("10.1.2.3", 16), Ok(0x0a01));
/// assert_eq!(encode("192.168.1.1", 32), Ok(0xc0a8_0101));
/// assert!(encode("10.1.2", 8).is_err());
/// ```
pub fn encode(dotted_quad: &str, len: u8) -> Result<u32, FibError> {
    if len > BITS {
        return Err(FibError::PrefixLengthInvalid(len));
    }
    let addr = parse_octets(dotted_quad)?;
    Ok(shr_or_zero(addr, (BITS - len) as u32))
}

/// Turn a right-aligned pattern of `len` bits back into an address, with
/// all bits after `len` set to zero.
pub fn decode(bits: u32, len: u8) -> Ipv4Addr {
    Ipv4Addr::from(shl_or_zero(bits, BITS.saturating_sub(len) as u32))
}

/// Keep only the `len` low-order bits of `bits`.
pub(crate) fn truncate_to_len(bits: u32, len: u8) -> u32 {
    if len >= BITS {
        return bits;
    }
    bits & ((1_u32 << len) - 1)
}

// `str::parse::<u8>` accepts a leading `+`, which is not an octet.
fn parse_octets(dotted_quad: &str) -> Result<u32, FibError> {
    let malformed = || FibError::MalformedAddress(dotted_quad.to_string());

    let mut addr = 0_u32;
    let mut count = 0;
    for token in dotted_quad.split('.') {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let octet: u8 = token.parse().map_err(|_| malformed())?;
        addr = (addr << 8) | octet as u32;
        count += 1;
        if count > 4 {
            return Err(malformed());
        }
    }
    if count != 4 {
        return Err(malformed());
    }
    Ok(addr)
}

// Shifting a u32 by 32 panics in debug mode, these two return zero
// instead.
fn shr_or_zero(bits: u32, rhs: u32) -> u32 {
    bits.checked_shr(rhs).unwrap_or(0)
}

fn shl_or_zero(bits: u32, rhs: u32) -> u32 {
    bits.checked_shl(rhs).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_shifts_to_len() {
        assert_eq!(encode("10.0.0.0", 8), Ok(10));
        assert_eq!(encode("172.16.0.0", 12), Ok(0xac1));
        assert_eq!(encode("255.255.255.255", 32), Ok(u32::MAX));
        assert_eq!(encode("255.255.255.255", 0), Ok(0));
        assert_eq!(encode("128.0.0.0", 1), Ok(1));
    }

    #[test]
    fn encode_rejects_malformed() {
        for bad in [
            "", "1.2.3", "1.2.3.4.5", "1.2.3.256", "1..2.3", "a.b.c.d",
            "1.2.3.-4", "+1.2.3.4", " 1.2.3.4", "1.2.3.4/8",
        ] {
            assert_eq!(
                encode(bad, 32),
                Err(FibError::MalformedAddress(bad.to_string())),
                "{:?} should not parse",
                bad
            );
        }
    }

    #[test]
    fn encode_rejects_long_prefix() {
        assert_eq!(encode("1.2.3.4", 33), Err(FibError::PrefixLengthInvalid(33)));
    }

    #[test]
    fn decode_restores_network() {
        assert_eq!(decode(0xac1, 12), Ipv4Addr::new(172, 16, 0, 0));
        assert_eq!(decode(0, 0), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(decode(0xc0a8_0101, 32), Ipv4Addr::new(192, 168, 1, 1));
    }

    #[test]
    fn truncate_keeps_low_bits() {
        assert_eq!(truncate_to_len(0xffff_ffff, 0), 0);
        assert_eq!(truncate_to_len(0xffff_ffff, 4), 0xf);
        assert_eq!(truncate_to_len(0xdead_beef, 32), 0xdead_beef);
    }
}
