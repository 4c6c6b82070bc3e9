//! Linear scan over all stored prefixes.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use log::trace;

use crate::{IpLookup, Prefix};

/// Unordered list of routes, scanned in full on every lookup.
///
/// This is the reference every trie is checked against: for any set of prefixes and any address,
/// the tries must return the same next-hop as this table (up to the documented exceptions of
/// [`MultibitTrie`](crate::MultibitTrie) and a compressed
/// [`PathCompressedTrie`](crate::PathCompressedTrie)).
#[derive(Clone, Debug)]
pub struct LinearSearchLookup<T> {
    entries: Vec<(Ipv4Net, T)>,
}

impl<T> Default for LinearSearchLookup<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> LinearSearchLookup<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, counting every insert (duplicates included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was inserted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Ipv4Net, &T)> {
        self.entries.iter().map(|(p, t)| (p, t))
    }
}

impl<T> IpLookup<T> for LinearSearchLookup<T> {
    fn insert_prefix(&mut self, prefix: Ipv4Net, next_hop: T) {
        let prefix = prefix.trunc();
        trace!("append {prefix} as entry {}", self.entries.len());
        self.entries.push((prefix, next_hop));
    }

    /// Scan all entries and keep the longest one containing `addr`. Among entries of equal
    /// length (which must then be the same prefix), the one inserted last wins.
    ///
    /// ```
    /// # use ip_lookup::*;
    /// # fn main() -> Result<(), Error> {
    /// let mut table = LinearSearchLookup::new();
    /// table.insert("192.168.1.0/24", "X")?;
    /// table.insert("192.168.1.0/24", "Y")?;
    /// assert_eq!(table.lookup("192.168.1.1")?, Some(&"Y"));
    /// # Ok(())
    /// # }
    /// ```
    fn lookup_addr(&self, addr: Ipv4Addr) -> Option<&T> {
        let addr = u32::from(addr);
        let mut best_match: Option<(u8, &T)> = None;
        for (prefix, next_hop) in &self.entries {
            if !prefix.matches(addr) {
                continue;
            }
            let len = Prefix::prefix_len(prefix);
            if best_match.map_or(true, |(best_len, _)| len >= best_len) {
                best_match = Some((len, next_hop));
            }
        }
        best_match.map(|(_, next_hop)| next_hop)
    }
}

impl<T> FromIterator<(Ipv4Net, T)> for LinearSearchLookup<T> {
    fn from_iter<I: IntoIterator<Item = (Ipv4Net, T)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<T> Extend<(Ipv4Net, T)> for LinearSearchLookup<T> {
    fn extend<I: IntoIterator<Item = (Ipv4Net, T)>>(&mut self, iter: I) {
        iter.into_iter()
            .for_each(|(prefix, next_hop)| self.insert_prefix(prefix, next_hop));
    }
}
