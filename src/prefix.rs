//! Bit-level keys for prefixes and addresses, and parsing of their textual form.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use num_traits::{CheckedShr, PrimInt, Unsigned, Zero};

use crate::Error;

/// Trait for keys that the engines walk bit by bit.
///
/// Bits are counted from the left: bit 0 is the most significant bit of the representation.
pub trait Prefix: Sized {
    /// How can the prefix be represented. This must be one of `u8`, `u16`, `u32`, `u64`, or `u128`.
    type R: Unsigned + PrimInt + Zero + CheckedShr;

    /// Get raw representation of the address, ignoring the prefix length.
    fn repr(&self) -> Self::R;

    /// Prefix length
    fn prefix_len(&self) -> u8;

    /// mask `self.repr()` using `self.prefix_len()`.
    fn mask(&self) -> Self::R {
        self.repr() & mask_from_prefix_len(self.prefix_len())
    }

    /// Check whether the top `prefix_len` bits of `addr` are equal to the ones of `self`.
    fn matches(&self, addr: Self::R) -> bool {
        addr & mask_from_prefix_len(self.prefix_len()) == self.mask()
    }

    /// Check if a specific bit is set (counted from the left, where 0 is the first bit from the
    /// left). Bits beyond the prefix length, or beyond the width of `R`, are never set.
    fn is_bit_set(&self, bit: u8) -> bool {
        let mask = (!Self::R::zero())
            .checked_shr(bit as u32)
            .unwrap_or_else(Self::R::zero)
            ^ (!Self::R::zero())
                .checked_shr(1u32 + bit as u32)
                .unwrap_or_else(Self::R::zero);
        mask & self.mask() != Self::R::zero()
    }

    /// Read `stride` bits starting at bit `offset` as an integer, most significant bit first.
    /// Positions past the end of the key read as zero. `stride` must not exceed 32.
    fn chunk(&self, offset: u8, stride: u8) -> u32 {
        debug_assert!(stride <= 32);
        (0..stride).fold(0u32, |acc, i| {
            let bit = offset.saturating_add(i);
            (acc << 1) | self.is_bit_set(bit) as u32
        })
    }
}

pub(crate) fn mask_from_prefix_len<R>(len: u8) -> R
where
    R: PrimInt + Zero,
{
    if len as u32 >= R::zero().count_zeros() {
        !R::zero()
    } else if len == 0 {
        R::zero()
    } else {
        !((!R::zero()) >> len as usize)
    }
}

impl Prefix for Ipv4Net {
    type R = u32;

    fn repr(&self) -> u32 {
        self.addr().into()
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len()
    }

    fn mask(&self) -> u32 {
        self.network().into()
    }
}

impl Prefix for Ipv4Addr {
    type R = u32;

    fn repr(&self) -> u32 {
        (*self).into()
    }

    fn prefix_len(&self) -> u8 {
        32
    }

    fn mask(&self) -> u32 {
        (*self).into()
    }
}

impl<R> Prefix for (R, u8)
where
    R: Unsigned + PrimInt + Zero + CheckedShr,
{
    type R = R;

    fn repr(&self) -> R {
        self.0
    }

    fn prefix_len(&self) -> u8 {
        self.1
    }
}

/// Parse a CIDR prefix such as `"10.1.0.0/16"`. A bare address is read as a `/32` host route.
/// Host bits are masked out, so `"10.1.2.3/8"` yields `10.0.0.0/8`.
///
/// ```
/// # use ip_lookup::prefix::parse_prefix;
/// # fn main() -> Result<(), ip_lookup::Error> {
/// assert_eq!(parse_prefix("10.1.2.3/8")?.to_string(), "10.0.0.0/8");
/// assert_eq!(parse_prefix("192.168.1.1")?.to_string(), "192.168.1.1/32");
/// assert!(parse_prefix("10.0.0.0/33").is_err());
/// # Ok(())
/// # }
/// ```
pub fn parse_prefix(s: &str) -> Result<Ipv4Net, Error> {
    let net = if s.contains('/') {
        s.parse::<Ipv4Net>()
            .map_err(|_| Error::invalid_format(s))?
    } else {
        Ipv4Net::new(parse_addr(s)?, 32).map_err(|_| Error::invalid_format(s))?
    };
    Ok(net.trunc())
}

/// Parse a dotted-quad address such as `"192.168.0.1"`.
pub fn parse_addr(s: &str) -> Result<Ipv4Addr, Error> {
    s.parse().map_err(|_| Error::invalid_format(s))
}

/// Parse a CIDR prefix into its raw `(network, length)` key.
///
/// ```
/// # use ip_lookup::prefix::parse_key;
/// assert_eq!(parse_key("10.0.0.0/8"), Ok((0x0a00_0000, 8)));
/// ```
pub fn parse_key(s: &str) -> Result<(u32, u8), Error> {
    let net = parse_prefix(s)?;
    Ok((Prefix::mask(&net), net.prefix_len()))
}
