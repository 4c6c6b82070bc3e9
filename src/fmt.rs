//! Rendering of trie structures for diagnostics.

use std::fmt::{Display, Formatter, Result};

use ipnet::Ipv4Net;

use crate::Lines;

/// The label of an edge between a node and one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Edge {
    /// Edge of a binary trie, taken when the next bit is set (`true`) or not (`false`).
    Bit(bool),
    /// Edge of a multibit trie, taken when the next `stride` bits read as `value`.
    Chunk {
        /// The chunk value.
        value: u32,
        /// Number of bits in the chunk.
        stride: u8,
    },
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Edge::Bit(bit) => write!(f, "{}", *bit as u8),
            Edge::Chunk { value, stride } => {
                write!(f, "{value:0width$b}", width = *stride as usize)
            }
        }
    }
}

/// One record of a depth-first structure dump.
#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a, T> {
    /// A node of the trie.
    Node {
        /// Distance from the root, in nodes.
        depth: usize,
        /// The route stored at this node, if any.
        route: Option<&'a (Ipv4Net, T)>,
        /// Number of bits skipped below this node, for path-compressed tries.
        skip: Option<u8>,
    },
    /// The edge leading from the previously rendered node at `depth` to its next child.
    Edge {
        /// Depth of the parent node.
        depth: usize,
        /// Label of the edge.
        edge: Edge,
    },
}

impl<T: Display> Display for Line<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Line::Node { depth, route, skip } => {
                write!(f, "{:indent$}", "", indent = 2 * *depth)?;
                match route {
                    Some((prefix, next_hop)) => write!(f, "Prefix: {prefix}, Next Hop: {next_hop}")?,
                    None => f.write_str("No prefix")?,
                }
                if let Some(skip) = skip {
                    write!(f, ", Skip: {skip}")?;
                }
                Ok(())
            }
            Line::Edge { depth, edge } => write!(f, "{:indent$}{edge} ->", "", indent = 2 * *depth),
        }
    }
}

/// Tries that can render their structure.
pub trait TrieStructure<T> {
    /// Name written in the heading of a dump.
    const NAME: &'static str;

    /// Iterate over all nodes and edges in depth-first order. Every call starts a fresh traversal.
    fn lines(&self) -> Lines<'_, T>;

    /// Render the structure as text, one line per node or edge, indented by depth.
    ///
    /// ```
    /// # use ip_lookup::*;
    /// # fn main() -> Result<(), Error> {
    /// let mut trie = BinaryTrie::new();
    /// trie.insert("128.0.0.0/1", "R")?;
    /// assert_eq!(
    ///     trie.dump().to_string(),
    ///     "Binary Trie Structure:\nNo prefix\n1 ->\n  Prefix: 128.0.0.0/1, Next Hop: R\n"
    /// );
    /// # Ok(())
    /// # }
    /// ```
    fn dump(&self) -> Dump<'_, T> {
        Dump {
            name: Self::NAME,
            lines: self.lines(),
        }
    }
}

/// Text rendering of a trie structure, see [`TrieStructure::dump`].
pub struct Dump<'a, T> {
    name: &'static str,
    lines: Lines<'a, T>,
}

impl<T: Display> Display for Dump<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "{} Structure:", self.name)?;
        for line in self.lines.clone() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
