//! Undirected graphs over dense node ids.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

/// An undirected simple graph stored as per-node neighbour sets.
///
/// Nodes are the ids `0..len()`. Self loops are ignored and parallel edges are
/// collapsed, so the structure always describes a simple graph.
///
/// # Examples
///
/// ```
/// use puzzlegate_core::Adjacency;
///
/// let mut graph = Adjacency::new(4);
/// graph.add_edge(0, 1);
/// graph.add_edge(1, 0);
/// graph.add_edge(2, 2);
/// assert_eq!(graph.edge_count(), 1);
/// assert!(!graph.is_connected());
///
/// graph.add_edge(1, 2);
/// graph.add_edge(3, 0);
/// assert!(graph.is_connected());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Adjacency {
    neighbors: Vec<BTreeSet<usize>>,
}

impl Adjacency {
    /// Creates a graph with `len` nodes and no edges.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            neighbors: vec![BTreeSet::new(); len],
        }
    }

    /// Creates a graph with `len` nodes from an edge list.
    ///
    /// # Panics
    ///
    /// Panics if an edge refers to a node outside `0..len`.
    #[must_use]
    pub fn from_edges<I>(len: usize, edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut graph = Self::new(len);
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// Returns the number of nodes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Adds the undirected edge `a - b`.
    ///
    /// Returns `true` if the edge was not present before. Self loops are ignored
    /// and return `false`.
    ///
    /// # Panics
    ///
    /// Panics if `a` or `b` is not a node of the graph.
    pub fn add_edge(&mut self, a: usize, b: usize) -> bool {
        assert!(
            a < self.len() && b < self.len(),
            "edge ({a}, {b}) out of range for {} nodes",
            self.len()
        );
        if a == b {
            return false;
        }
        let added = self.neighbors[a].insert(b);
        self.neighbors[b].insert(a);
        added
    }

    /// Returns `true` if `a` and `b` are adjacent.
    #[must_use]
    pub fn contains_edge(&self, a: usize, b: usize) -> bool {
        self.neighbors.get(a).is_some_and(|set| set.contains(&b))
    }

    /// Returns the neighbours of `node` in ascending order.
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors[node].iter().copied()
    }

    /// Returns the number of neighbours of `node`.
    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        self.neighbors[node].len()
    }

    /// Returns the number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Returns every edge once as `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.neighbors.iter().enumerate().flat_map(|(a, set)| {
            set.range(a + 1..).map(move |&b| (a, b))
        })
    }

    /// Returns, for every node, whether it is reachable from `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not a node of the graph.
    #[must_use]
    pub fn reachable_from(&self, start: usize) -> Vec<bool> {
        let mut visited = vec![false; self.len()];
        let mut queue = VecDeque::from([start]);
        visited[start] = true;
        while let Some(node) = queue.pop_front() {
            for next in self.neighbors(node) {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
        visited
    }

    /// Returns `true` if every node is reachable from node 0.
    ///
    /// Graphs with zero or one node are connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        self.reachable_from(0).into_iter().all(|seen| seen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_are_listed_once() {
        let graph = Adjacency::from_edges(4, [(2, 0), (0, 2), (3, 1), (1, 2)]);
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![(0, 2), (1, 2), (1, 3)]);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.degree(2), 2);
    }

    #[test]
    fn test_reachability() {
        let graph = Adjacency::from_edges(5, [(0, 1), (1, 2), (3, 4)]);
        assert_eq!(
            graph.reachable_from(0),
            vec![true, true, true, false, false]
        );
        assert_eq!(
            graph.reachable_from(4),
            vec![false, false, false, true, true]
        );
        assert!(!graph.is_connected());
    }

    #[test]
    fn test_trivial_graphs_are_connected() {
        assert!(Adjacency::new(0).is_connected());
        assert!(Adjacency::new(1).is_connected());
        assert!(!Adjacency::new(2).is_connected());
    }

    #[test]
    fn test_self_loop_is_ignored() {
        let mut graph = Adjacency::new(2);
        assert!(!graph.add_edge(1, 1));
        assert!(!graph.contains_edge(1, 1));
        assert!(graph.add_edge(0, 1));
        assert!(!graph.add_edge(1, 0));
        assert!(graph.contains_edge(1, 0));
    }
}
