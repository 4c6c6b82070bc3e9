//! Binary trie with path compression.
//!
//! Each node carries a `skip` count: the number of bits consumed below the node before the next
//! bit decides between the left and the right child. A node with `skip == n` stands for itself
//! followed by a chain of `n` nodes that each had a single child and stored no route.
//!
//! Inserting builds the trie bit by bit, leaving every `skip` at zero. Once all prefixes are in,
//! [`PathCompressedTrie::compress`] fuses the single-child chains. Lookups trust the skip counts
//! and never compare the skipped bits with the address. After compressing, an address that
//! differs from all stored prefixes only within skipped bits is routed as if it matched:
//!
//! ```
//! # use ip_lookup::*;
//! # fn main() -> Result<(), Error> {
//! let mut trie = PathCompressedTrie::new();
//! trie.insert("10.0.0.0/8", "A")?;
//! assert_eq!(trie.lookup("192.168.0.1")?, None);
//! trie.compress(); // the root now skips bits 0 to 6 and branches on bit 7
//! assert_eq!(trie.lookup("192.168.0.1")?, Some(&"A"));
//! # Ok(())
//! # }
//! ```

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use log::{debug, trace};

use crate::fmt::Edge;
use crate::iter::TrieNode;
use crate::{IpLookup, Iter, Lines, Prefix, TrieStructure};

#[derive(Clone, Debug)]
struct Node<T> {
    left: Option<Box<Node<T>>>,
    right: Option<Box<Node<T>>>,
    skip: u8,
    route: Option<(Ipv4Net, T)>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            left: None,
            right: None,
            skip: 0,
            route: None,
        }
    }
}

impl<T> Node<T> {
    #[inline(always)]
    fn child(&self, right: bool) -> Option<&Node<T>> {
        if right {
            self.right.as_deref()
        } else {
            self.left.as_deref()
        }
    }

    #[inline(always)]
    fn slot(&mut self, right: bool) -> &mut Option<Box<Node<T>>> {
        if right {
            &mut self.right
        } else {
            &mut self.left
        }
    }

    fn child_or_insert(&mut self, right: bool) -> &mut Node<T> {
        self.slot(right).get_or_insert_with(Default::default)
    }

    fn any_child(&self) -> Option<&Node<T>> {
        self.left.as_deref().or(self.right.as_deref())
    }

    fn next_hop(&self) -> Option<&T> {
        self.route.as_ref().map(|(_, t)| t)
    }

    /// Direction of the only child, if there is exactly one and it stores no route.
    fn fusable_child(&self) -> Option<bool> {
        match (&self.left, &self.right) {
            (Some(child), None) if child.route.is_none() => Some(false),
            (None, Some(child)) if child.route.is_none() => Some(true),
            _ => None,
        }
    }

    /// Fuse all single-child chains at and below this node. Returns the number of fused nodes.
    fn compress(&mut self) -> usize {
        let mut fused = 0;
        while let Some(right) = self.fusable_child() {
            let Some(child) = self.slot(right).take() else {
                break;
            };
            let child = *child;
            self.skip += 1 + child.skip;
            self.left = child.left;
            self.right = child.right;
            fused += 1;
        }
        fused
            + self
                .left
                .iter_mut()
                .chain(self.right.iter_mut())
                .map(|child| child.compress())
                .sum::<usize>()
    }

    /// Any prefix stored below this node. Every leaf stores a route, so there is one as long as
    /// the node has children.
    fn descendant_prefix(&self) -> Option<Ipv4Net> {
        let mut node = self.any_child()?;
        loop {
            if let Some((prefix, _)) = &node.route {
                return Some(*prefix);
            }
            node = node.any_child()?;
        }
    }

    /// Replace the skipped bits below this node by a chain of explicit nodes, with the node at
    /// the end of the chain taking over the children. `depth` is the number of bits consumed on
    /// the way to this node.
    fn unfold(&mut self, depth: u8) {
        let skip = std::mem::take(&mut self.skip);
        let Some(key) = self.descendant_prefix() else {
            return;
        };
        let mut below = Node {
            left: self.left.take(),
            right: self.right.take(),
            ..Default::default()
        };
        // `below` sits at `depth + skip`; each new parent at depth `bit` branches on `bit`.
        for bit in (depth + 1..depth + skip).rev() {
            let mut parent = Node::default();
            *parent.slot(key.is_bit_set(bit)) = Some(Box::new(below));
            below = parent;
        }
        *self.slot(key.is_bit_set(depth)) = Some(Box::new(below));
    }
}

impl<T> TrieNode<T> for Node<T> {
    fn route(&self) -> Option<&(Ipv4Net, T)> {
        self.route.as_ref()
    }

    fn skip(&self) -> Option<u8> {
        Some(self.skip)
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

/// Binary trie whose single-child chains can be collapsed into skip counts.
#[derive(Clone, Debug)]
pub struct PathCompressedTrie<T> {
    root: Node<T>,
    len: usize,
}

impl<T> Default for PathCompressedTrie<T> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }
}

impl<T> PathCompressedTrie<T> {
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

    /// Collapse every node whose only child stores no route into that child, adding the elided
    /// bit and the child's own skip count to the node's skip count. Call this once all prefixes
    /// are inserted. Returns the number of nodes removed from the trie.
    ///
    /// Inserting after compressing is allowed: the skipped bits on the path of the new prefix are
    /// expanded again.
    pub fn compress(&mut self) -> usize {
        let fused = self.root.compress();
        debug!("path compression fused {fused} nodes");
        fused
    }
}

impl<T> IpLookup<T> for PathCompressedTrie<T> {
    fn insert_prefix(&mut self, prefix: Ipv4Net, next_hop: T) {
        let prefix = prefix.trunc();
        let mut node = &mut self.root;
        for depth in 0..Prefix::prefix_len(&prefix) {
            if node.skip > 0 {
                trace!("unfold {} skipped bits at depth {depth}", node.skip);
                node.unfold(depth);
            }
            node = node.child_or_insert(prefix.is_bit_set(depth));
        }
        trace!("store {prefix} at depth {}", prefix.prefix_len());
        if node.route.replace((prefix, next_hop)).is_none() {
            self.len += 1;
        }
    }

    /// Starting at the root, repeatedly skip the node's skip count of bits, then branch on the
    /// following bit. Return the next-hop of the deepest node visited that stores a route.
    fn lookup_addr(&self, addr: Ipv4Addr) -> Option<&T> {
        let mut node = &self.root;
        let mut best_match = node.next_hop();
        let mut cursor: u8 = 0;
        loop {
            cursor = cursor.saturating_add(node.skip);
            if cursor >= 32 {
                break;
            }
            match node.child(addr.is_bit_set(cursor)) {
                Some(child) => node = child,
                None => break,
            }
            cursor += 1;
            best_match = node.next_hop().or(best_match);
        }
        best_match
    }
}

impl<T> TrieStructure<T> for PathCompressedTrie<T> {
    const NAME: &'static str = "Path Compressed Trie";

    fn lines(&self) -> Lines<'_, T> {
        Lines::new(&self.root)
    }
}

impl<T> FromIterator<(Ipv4Net, T)> for PathCompressedTrie<T> {
    fn from_iter<I: IntoIterator<Item = (Ipv4Net, T)>>(iter: I) -> Self {
        let mut trie = Self::new();
        trie.extend(iter);
        trie
    }
}

impl<T> Extend<(Ipv4Net, T)> for PathCompressedTrie<T> {
    fn extend<I: IntoIterator<Item = (Ipv4Net, T)>>(&mut self, iter: I) {
        iter.into_iter()
            .for_each(|(prefix, next_hop)| self.insert_prefix(prefix, next_hop));
    }
}
