//! Uncompressed binary trie, consuming one bit per level.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use log::trace;

use crate::fmt::Edge;
use crate::iter::TrieNode;
use crate::{IpLookup, Iter, Lines, Prefix, TrieStructure};

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) left: Option<Box<Node<T>>>,
    pub(crate) right: Option<Box<Node<T>>>,
    pub(crate) route: Option<(Ipv4Net, T)>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            left: None,
            right: None,
            route: None,
        }
    }
}

impl<T> Node<T> {
    #[inline(always)]
    pub(crate) fn child(&self, right: bool) -> Option<&Node<T>> {
        if right {
            self.right.as_deref()
        } else {
            self.left.as_deref()
        }
    }

    /// Get the child in the given direction, creating it if it does not exist yet.
    #[inline(always)]
    pub(crate) fn child_or_insert(&mut self, right: bool) -> &mut Node<T> {
        let slot = if right {
            &mut self.right
        } else {
            &mut self.left
        };
        slot.get_or_insert_with(Default::default)
    }

    pub(crate) fn next_hop(&self) -> Option<&T> {
        self.route.as_ref().map(|(_, t)| t)
    }
}

impl<T> TrieNode<T> for Node<T> {
    fn route(&self) -> Option<&(Ipv4Net, T)> {
        self.route.as_ref()
    }

    fn children(&self) -> Vec<(Edge, &dyn TrieNode<T>)> {
        let mut children: Vec<(Edge, &dyn TrieNode<T>)> = Vec::with_capacity(2);
        if let Some(left) = self.left.as_deref() {
            children.push((Edge::Bit(false), left));
        }
        if let Some(right) = self.right.as_deref() {
            children.push((Edge::Bit(true), right));
        }
        children
    }
}

/// Binary trie: the path from the root to a node spells out the node's prefix, one bit per level.
#[derive(Clone, Debug)]
pub struct BinaryTrie<T> {
    root: Node<T>,
    len: usize,
}

impl<T> Default for BinaryTrie<T> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }
}

impl<T> BinaryTrie<T> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct prefixes stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no prefix is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over all stored routes in lexicographic order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root)
    }
}

impl<T> IpLookup<T> for BinaryTrie<T> {
    fn insert_prefix(&mut self, prefix: Ipv4Net, next_hop: T) {
        let prefix = prefix.trunc();
        let mut node = &mut self.root;
        for bit in 0..Prefix::prefix_len(&prefix) {
            node = node.child_or_insert(prefix.is_bit_set(bit));
        }
        trace!("store {prefix} at depth {}", prefix.prefix_len());
        if node.route.replace((prefix, next_hop)).is_none() {
            self.len += 1;
        }
    }

    /// Walk the bits of `addr` from the root for as long as the child exists, and return the
    /// next-hop of the deepest node visited that stores a route.
    ///
    /// ```
    /// # use ip_lookup::*;
    /// # fn main() -> Result<(), Error> {
    /// let mut trie = BinaryTrie::new();
    /// trie.insert("0.0.0.0/0", "DEFAULT")?;
    /// trie.insert("10.0.0.0/8", "A")?;
    /// assert_eq!(trie.lookup("20.0.0.0")?, Some(&"DEFAULT"));
    /// assert_eq!(trie.lookup("10.5.5.5")?, Some(&"A"));
    /// # Ok(())
    /// # }
    /// ```
    fn lookup_addr(&self, addr: Ipv4Addr) -> Option<&T> {
        let mut node = &self.root;
        let mut best_match = node.next_hop();
        for bit in 0..32 {
            match node.child(addr.is_bit_set(bit)) {
                Some(child) => node = child,
                None => break,
            }
            best_match = node.next_hop().or(best_match);
        }
        best_match
    }
}

impl<T> TrieStructure<T> for BinaryTrie<T> {
    const NAME: &'static str = "Binary Trie";

    fn lines(&self) -> Lines<'_, T> {
        Lines::new(&self.root)
    }
}

impl<T> FromIterator<(Ipv4Net, T)> for BinaryTrie<T> {
    fn from_iter<I: IntoIterator<Item = (Ipv4Net, T)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl<T> Extend<(Ipv4Net, T)> for BinaryTrie<T> {
    fn extend<I: IntoIterator<Item = (Ipv4Net, T)>>(&mut self, iter: I) {
        iter.into_iter()
            .for_each(|(prefix, next_hop)| self.insert_prefix(prefix, next_hop));
    }
}
