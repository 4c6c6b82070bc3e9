//! Fixed-stride multibit trie.
//!
//! Every level consumes `stride` bits of the key at once. A prefix whose length is not a multiple
//! of the stride ends in a partial chunk, which is completed with the bits following the prefix.
//! Since prefixes are stored with their host bits cleared, those filler bits are zero. A lookup,
//! on the other hand, reads the filler positions from the address itself. An address that lies
//! within such a prefix but has any of the filler bits set therefore does not reach the prefix's
//! node:
//!
//! ```
//! # use ip_lookup::*;
//! # fn main() -> Result<(), Error> {
//! let mut trie = MultibitTrie::new(); // stride 3: chunks cover bits 0-2, 3-5, 6-8, ...
//! trie.insert("10.0.0.0/8", "A")?;
//! assert_eq!(trie.lookup("10.1.0.0")?, Some(&"A")); // bit 8 is clear
//! assert_eq!(trie.lookup("10.128.0.0")?, None); // bit 8 is set
//! # Ok(())
//! # }
//! ```
//!
//! The padding also makes distinct prefixes collide. Two prefixes whose lengths round up to the
//! same number of chunks, and that agree once padded, end on the same node. That node holds a
//! single route, so the prefix inserted last replaces the other one:
//!
//! ```
//! # use ip_lookup::*;
//! # fn main() -> Result<(), Error> {
//! let mut trie = MultibitTrie::new();
//! trie.insert("128.0.0.0/4", "A")?; // chunks 100 and 000
//! trie.insert("128.0.0.0/5", "B")?; // chunks 100 and 000 as well
//! assert_eq!(trie.len(), 1);
//! assert_eq!(trie.lookup("128.0.0.1")?, Some(&"B"));
//! # Ok(())
//! # }
//! ```
//!
//! With prefix lengths that are multiples of the stride, neither effect occurs and the trie
//! matches exactly like [`BinaryTrie`](crate::BinaryTrie).

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use log::{debug, trace};

use crate::fmt::Edge;
use crate::iter::TrieNode;
use crate::{Error, IpLookup, Iter, Lines, Prefix, TrieStructure};

/// Stride of [`MultibitTrie::new`].
pub const DEFAULT_STRIDE: u8 = 3;

/// Largest stride a [`MultibitTrie`] accepts, i.e. the key width.
pub const MAX_STRIDE: u8 = 32;

#[derive(Clone, Debug)]
struct Node<T> {
    stride: u8,
    children: BTreeMap<u32, Node<T>>,
    route: Option<(Ipv4Net, T)>,
}

impl<T> Node<T> {
    fn new(stride: u8) -> Self {
        Self {
            stride,
            children: BTreeMap::new(),
            route: None,
        }
    }
}

impl<T> TrieNode<T> for Node<T> {
    fn route(&self) -> Option<&(Ipv4Net, T)> {
        self.route.as_ref()
    }

    fn children(&self) -> Vec<(Edge, &dyn TrieNode<T>)> {
        self.children
            .iter()
            .map(|(value, child)| {
                let edge = Edge::Chunk {
                    value: *value,
                    stride: self.stride,
                };
                (edge, child as &dyn TrieNode<T>)
            })
            .collect()
    }
}

/// Trie whose nodes branch on `stride` bits at a time.
#[derive(Clone, Debug)]
pub struct MultibitTrie<T> {
    stride: u8,
    root: Node<T>,
    len: usize,
}

impl<T> Default for MultibitTrie<T> {
    fn default() -> Self {
        Self {
            stride: DEFAULT_STRIDE,
            root: Node::new(DEFAULT_STRIDE),
            len: 0,
        }
    }
}

impl<T> MultibitTrie<T> {
    /// Create an empty trie with a stride of [`DEFAULT_STRIDE`] bits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty trie consuming `stride` bits per level. The stride must be between 1 and
    /// [`MAX_STRIDE`].
    ///
    /// ```
    /// # use ip_lookup::*;
    /// assert_eq!(MultibitTrie::<()>::with_stride(8).map(|t| t.stride()), Ok(8));
    /// assert_eq!(MultibitTrie::<()>::with_stride(0).map(|t| t.stride()), Err(Error::InvalidStride(0)));
    /// ```
    pub fn with_stride(stride: u8) -> Result<Self, Error> {
        if !(1..=MAX_STRIDE).contains(&stride) {
            return Err(Error::InvalidStride(stride));
        }
        debug!("multibit trie with a stride of {stride} bits");
        Ok(Self {
            stride,
            root: Node::new(stride),
            len: 0,
        })
    }

    /// Number of bits consumed per level.
    pub fn stride(&self) -> u8 {
        self.stride
    }

    /// Number of nodes holding a route. Colliding prefixes share a node and count once.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no prefix is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over all stored routes, ordered by chunk value at every level. Of two colliding
    /// prefixes, only the one inserted last is yielded.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root)
    }

    /// Bit offsets of the chunks covering the first `len` bits.
    fn offsets(stride: u8, len: u8) -> impl Iterator<Item = u8> {
        (0..len).step_by(stride as usize)
    }
}

impl<T> IpLookup<T> for MultibitTrie<T> {
    fn insert_prefix(&mut self, prefix: Ipv4Net, next_hop: T) {
        let prefix = prefix.trunc();
        let stride = self.stride;
        let mut node = &mut self.root;
        for offset in Self::offsets(stride, Prefix::prefix_len(&prefix)) {
            node = node
                .children
                .entry(prefix.chunk(offset, stride))
                .or_insert_with(|| Node::new(stride));
        }
        trace!("store {prefix} with stride {stride}");
        if node.route.replace((prefix, next_hop)).is_none() {
            self.len += 1;
        }
    }

    /// Walk the address chunk by chunk for as long as the child exists, and return the next-hop
    /// of the deepest node visited that stores a route.
    fn lookup_addr(&self, addr: Ipv4Addr) -> Option<&T> {
        let mut node = &self.root;
        let mut best_match = node.route.as_ref().map(|(_, t)| t);
        for offset in Self::offsets(self.stride, 32) {
            match node.children.get(&addr.chunk(offset, self.stride)) {
                Some(child) => node = child,
                None => break,
            }
            best_match = node.route.as_ref().map(|(_, t)| t).or(best_match);
        }
        best_match
    }
}

impl<T> TrieStructure<T> for MultibitTrie<T> {
    const NAME: &'static str = "Multibit Trie";

    fn lines(&self) -> Lines<'_, T> {
        Lines::new(&self.root)
    }
}

impl<T> FromIterator<(Ipv4Net, T)> for MultibitTrie<T> {
    fn from_iter<I: IntoIterator<Item = (Ipv4Net, T)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl<T> Extend<(Ipv4Net, T)> for MultibitTrie<T> {
    fn extend<I: IntoIterator<Item = (Ipv4Net, T)>>(&mut self, iter: I) {
        iter.into_iter()
            .for_each(|(prefix, next_hop)| self.insert_prefix(prefix, next_hop));
    }
}
