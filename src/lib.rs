//! This crate provides longest-prefix-match (LPM) lookup engines for IPv4 routing tables. Given a
//! set of prefixes, each bound to a next-hop label, a lookup returns the next-hop of the longest
//! stored prefix that contains the queried address.
//!
//! Four engines implement the same [`IpLookup`] capability:
//!
//! - [`LinearSearchLookup`] scans every stored entry. It defines the expected result of any
//!   lookup and serves as the oracle the tries are checked against.
//! - [`BinaryTrie`] walks one bit per level.
//! - [`MultibitTrie`] walks `stride` bits per level, trading depth for fan-out.
//! - [`PathCompressedTrie`] is a binary trie whose chains of single-child nodes can be fused into
//!   one node that records how many bits it skips.
//!
//! ```
//! # use ip_lookup::*;
//! # fn main() -> Result<(), Error> {
//! let mut trie = BinaryTrie::new();
//! trie.insert("10.0.0.0/8", "A")?;
//! trie.insert("10.1.0.0/16", "B")?;
//! trie.insert("10.1.2.0/24", "C")?;
//! assert_eq!(trie.lookup("10.1.2.5")?, Some(&"C"));
//! assert_eq!(trie.lookup("10.1.3.5")?, Some(&"B"));
//! assert_eq!(trie.lookup("10.2.0.0")?, Some(&"A"));
//! assert_eq!(trie.lookup("192.168.0.1")?, None);
//! # Ok(())
//! # }
//! ```
//!
//! # Description of the Tries
//!
//! Every trie is an owning tree: a node owns its children, and the root is owned by the trie.
//! Nodes are created while inserting and never removed. A node carries a route if a prefix ends
//! at its depth. A lookup starts at the root and descends as long as the address selects an
//! existing child, remembering the route of the deepest node visited. Since depth only grows on
//! the way down, the last route seen is the longest match.
//!
//! All engines assume that every insert happens before the lookups. They are plain single
//! threaded data structures without interior mutability; share them read-only once built.
//!
//! # Structure dumps
//!
//! The tries implement [`TrieStructure`], which renders the tree depth-first as a sequence of
//! [`fmt::Line`] records, or as text through [`TrieStructure::dump`].
//!
//! | Operation       | `LinearSearchLookup` | `BinaryTrie` | `MultibitTrie`   | `PathCompressedTrie` |
//! |-----------------|----------------------|--------------|------------------|----------------------|
//! | `insert`        | `O(1)`               | `O(w)`       | `O(w / stride)`  | `O(w)`               |
//! | `lookup`        | `O(n)`               | `O(w)`       | `O(w / stride)`  | `O(w)`               |
//!
//! where `n` is the number of stored prefixes and `w = 32` the key width.

#![deny(missing_docs)]

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

pub mod binary;
pub mod compressed;
#[cfg(feature = "dataset")]
pub mod dataset;
mod error;
pub mod fmt;
mod iter;
pub mod linear;
pub mod multibit;
pub mod prefix;
#[cfg(feature = "serde")]
mod serde;

#[cfg(test)]
mod fuzzing;

pub use binary::BinaryTrie;
pub use compressed::PathCompressedTrie;
pub use error::Error;
pub use fmt::TrieStructure;
pub use iter::{Iter, Lines};
pub use linear::LinearSearchLookup;
pub use multibit::MultibitTrie;
pub use prefix::Prefix;

/// The capability shared by all lookup engines.
pub trait IpLookup<T> {
    /// Store `next_hop` for `prefix`. Host bits of `prefix` are masked out first. Inserting a
    /// prefix that is already present replaces its next-hop.
    fn insert_prefix(&mut self, prefix: Ipv4Net, next_hop: T);

    /// Get the next-hop of the longest stored prefix containing `addr`.
    fn lookup_addr(&self, addr: Ipv4Addr) -> Option<&T>;

    /// Parse `prefix` as CIDR notation and insert it.
    ///
    /// ```
    /// # use ip_lookup::*;
    /// let mut table = LinearSearchLookup::new();
    /// assert!(table.insert("10.0.0.0/8", "A").is_ok());
    /// assert!(table.insert("10.0.0.0/33", "B").is_err());
    /// ```
    fn insert(&mut self, prefix: &str, next_hop: T) -> Result<(), Error> {
        let prefix = prefix::parse_prefix(prefix)?;
        self.insert_prefix(prefix, next_hop);
        Ok(())
    }

    /// Parse `addr` as a dotted-quad address and look it up. Returns `Ok(None)` if no stored
    /// prefix contains the address.
    fn lookup(&self, addr: &str) -> Result<Option<&T>, Error> {
        let addr = prefix::parse_addr(addr)?;
        Ok(self.lookup_addr(addr))
    }
}
