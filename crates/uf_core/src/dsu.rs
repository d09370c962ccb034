//! Arena-backed union-find forest of cluster nodes.
//!
//! Every lattice vertex that joins a cluster gets one [`ClusterNode`] in the
//! arena. Two relations are kept side by side:
//!
//! - the union-find relation (`parent` / `children`), rewritten by path
//!   compression and used to answer "which cluster owns this vertex",
//! - the growth link, fixed when a vertex is absorbed, which records the
//!   lattice edge the vertex was reached through. Peeling walks these links.
//!
//! Nodes are never freed during a decode call; a node that loses its root
//! status simply gains a parent.

use alloc::vec::Vec;
use uf_common::Coord;

/// Stable handle to a node in a [`ClusterForest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The lattice edge a node was absorbed through and the node it grew from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthLink {
    pub towards: NodeId,
    pub edge: Coord,
}

/// A union-find element tied to one lattice vertex.
#[derive(Debug, Clone)]
pub struct ClusterNode {
    coord: Coord,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    growth: Option<GrowthLink>,
}

impl ClusterNode {
    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Edge this node was absorbed through; `None` for seeded defects.
    pub fn growth(&self) -> Option<GrowthLink> {
        self.growth
    }
}

/// Owner of all cluster nodes created during one decode call.
#[derive(Debug, Default)]
pub struct ClusterForest {
    nodes: Vec<ClusterNode>,
}

impl ClusterForest {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Creates a parentless node for `coord` and returns its handle.
    pub fn spawn(&mut self, coord: Coord) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ClusterNode {
            coord,
            parent: None,
            children: Vec::new(),
            growth: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline(always)]
    pub fn node(&self, id: NodeId) -> &ClusterNode {
        &self.nodes[id.index()]
    }

    #[inline(always)]
    pub fn coord(&self, id: NodeId) -> Coord {
        self.nodes[id.index()].coord
    }

    /// Iterates over every node handle in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Finds the root of the tree containing `id`, with path compression.
    ///
    /// Walks the parent chain to the root, then re-parents every node seen
    /// on the way directly onto the root. Child lists are kept in sync so
    /// the parent/child relation stays a forest after compression.
    ///
    /// # Arguments
    ///
    /// * `id` - Node whose root is requested
    ///
    /// # Returns
    ///
    /// The handle of the root node.
    pub fn find_root(&mut self, id: NodeId) -> NodeId {
        let root = self.root_of(id);
        let mut cursor = id;
        while let Some(parent) = self.nodes[cursor.index()].parent {
            if parent != root {
                self.relink(cursor, root);
            }
            cursor = parent;
        }
        root
    }

    /// Root lookup without compression, for read-only callers.
    pub fn root_of(&self, mut id: NodeId) -> NodeId {
        while let Some(parent) = self.nodes[id.index()].parent {
            id = parent;
        }
        id
    }

    /// Makes `parent` the union-find parent of `child`.
    ///
    /// Detaches `child` from any previous parent first. Size and parity
    /// bookkeeping is left to the cluster layer.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        debug_assert_ne!(parent, child);
        self.relink(child, parent);
    }

    /// Records the edge `child` was absorbed through.
    pub fn record_growth(&mut self, child: NodeId, link: GrowthLink) {
        self.nodes[child.index()].growth = Some(link);
    }

    fn relink(&mut self, child: NodeId, parent: NodeId) {
        if let Some(old) = self.nodes[child.index()].parent {
            self.nodes[old.index()].children.retain(|&c| c != child);
        }
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(forest: &mut ClusterForest, len: usize) -> Vec<NodeId> {
        let ids: Vec<NodeId> = (0..len)
            .map(|i| forest.spawn(Coord::new2(2 * i, 0)))
            .collect();
        for pair in ids.windows(2) {
            forest.attach(pair[0], pair[1]);
        }
        ids
    }

    #[test]
    fn find_root_compresses_the_path() {
        let mut forest = ClusterForest::new();
        let ids = chain(&mut forest, 5);

        assert_eq!(forest.find_root(ids[4]), ids[0]);
        for &id in &ids[1..] {
            assert_eq!(forest.node(id).parent(), Some(ids[0]));
        }
        assert_eq!(forest.node(ids[0]).children().len(), 4);
        assert!(forest.node(ids[2]).children().is_empty());
    }

    #[test]
    fn attach_moves_child_between_parents() {
        let mut forest = ClusterForest::new();
        let a = forest.spawn(Coord::new2(0, 0));
        let b = forest.spawn(Coord::new2(2, 0));
        let c = forest.spawn(Coord::new2(4, 0));
        forest.attach(a, c);
        forest.attach(b, c);
        assert!(forest.node(a).children().is_empty());
        assert_eq!(forest.node(b).children(), &[c]);
        assert_eq!(forest.root_of(c), b);
    }

    #[test]
    fn merged_trees_share_a_root() {
        let mut forest = ClusterForest::new();
        let left = chain(&mut forest, 3);
        let right = chain(&mut forest, 3);
        forest.attach(left[0], right[0]);
        for &id in left.iter().chain(right.iter()) {
            assert_eq!(forest.find_root(id), left[0]);
        }
    }
}
