//! Depth-first traversals shared by the tries.

use ipnet::Ipv4Net;

use crate::fmt::{Edge, Line};

/// Read access to a trie node, independent of how the trie stores its children.
pub(crate) trait TrieNode<T> {
    /// The route terminating at this node.
    fn route(&self) -> Option<&(Ipv4Net, T)>;

    /// Number of bits skipped below this node, for tries that compress paths.
    fn skip(&self) -> Option<u8> {
        None
    }

    /// Children in ascending edge order, labelled with the edge leading into them.
    fn children(&self) -> Vec<(Edge, &dyn TrieNode<T>)>;
}

enum Step<'a, T> {
    Node(usize, &'a dyn TrieNode<T>),
    Edge(usize, Edge),
}

impl<T> Clone for Step<'_, T> {
    fn clone(&self) -> Self {
        match self {
            Step::Node(depth, node) => Step::Node(*depth, *node),
            Step::Edge(depth, edge) => Step::Edge(*depth, *edge),
        }
    }
}

/// An iterator over the nodes and edges of a trie in depth-first order. Each node is followed by
/// its children, each child preceded by the edge that leads to it.
pub struct Lines<'a, T> {
    stack: Vec<Step<'a, T>>,
}

impl<'a, T> Lines<'a, T> {
    pub(crate) fn new(root: &'a dyn TrieNode<T>) -> Self {
        Self {
            stack: vec![Step::Node(0, root)],
        }
    }
}

impl<T> Clone for Lines<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<'a, T> Iterator for Lines<'a, T> {
    type Item = Line<'a, T>;

    fn next(&mut self) -> Option<Line<'a, T>> {
        match self.stack.pop()? {
            Step::Edge(depth, edge) => Some(Line::Edge { depth, edge }),
            Step::Node(depth, node) => {
                for (edge, child) in node.children().into_iter().rev() {
                    self.stack.push(Step::Node(depth + 1, child));
                    self.stack.push(Step::Edge(depth, edge));
                }
                Some(Line::Node {
                    depth,
                    route: node.route(),
                    skip: node.skip(),
                })
            }
        }
    }
}

/// An iterator over all routes stored in a trie, in depth-first order.
pub struct Iter<'a, T>(Lines<'a, T>);

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: &'a dyn TrieNode<T>) -> Self {
        Self(Lines::new(root))
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a Ipv4Net, &'a T);

    fn next(&mut self) -> Option<(&'a Ipv4Net, &'a T)> {
        for line in self.0.by_ref() {
            if let Line::Node {
                route: Some((prefix, next_hop)),
                ..
            } = line
            {
                return Some((prefix, next_hop));
            }
        }
        None
    }
}
