// MIT License
//
// Copyright (c) 2024 Erik Holum
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Strictly growing tree storing vertices with arbitrary data types.
//! Values must implement a distance trait to enable determination of nearest neighbors.
use crate::error::TreeError;
use ordered_float::OrderedFloat;
use std::collections::HashMap;

/// Caller assigned identifier of a node, unique within a tree.
pub type NodeId = usize;

/// Define a distance trait for tree node values.
pub trait Distance {
    fn distance(&self, other: &Self) -> f64;
}

/// Basic node element for the tree.
///
/// Parent and children are stored as slots in the owning [Tree]'s node vector, so
/// related nodes must be resolved through the tree.
#[derive(Debug)]
pub struct Node<V> {
    id: NodeId,

    // The value of this node.
    value: V,

    // Location of the nodes parent, if available
    parent: Option<usize>,

    // Locations of the children in the tree's vector, in insertion order.
    children: Vec<usize>,
}

impl<V> Node<V> {
    fn new(id: NodeId, value: V, parent: Option<usize>) -> Self {
        Node {
            id,
            value,
            parent,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// DFS Iterator for a [Tree]
pub struct DepthFirstIterator<'a, V> {
    tree: &'a Tree<V>,
    stack: Vec<usize>,
}

impl<'a, V> DepthFirstIterator<'a, V> {
    fn new(tree: &'a Tree<V>) -> Self {
        let mut stack = Vec::new();
        if !tree.nodes.is_empty() {
            // Root is always slot 0
            stack.push(0);
        }
        DepthFirstIterator { tree, stack }
    }
}

impl<'a, V> Iterator for DepthFirstIterator<'a, V> {
    type Item = &'a Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.nodes[slot];

        // Children should be pushed onto the stack in reverse order to ensure left-most
        // are processed first
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Acyclic tree that only ever grows.
///
/// Nodes are attached exactly once, under a parent that already exists, and are
/// never re-parented or removed. Node ids must be unique.
#[derive(Debug)]
pub struct Tree<V> {
    // Detailed node data for the tree, in insertion order. The root is slot 0.
    nodes: Vec<Node<V>>,

    // Constant time lookup of a node's slot by its id.
    slots: HashMap<NodeId, usize>,

    // Slot of the most recently added node.
    last_added: Option<usize>,
}

impl<V> Default for Tree<V> {
    fn default() -> Self {
        Tree {
            nodes: Vec::new(),
            slots: HashMap::new(),
            last_added: None,
        }
    }
}

impl<V> Tree<V> {
    /// Constructs an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the root of the tree.
    ///
    /// # Errors
    ///
    /// If the tree already has a root.
    pub fn add_root(&mut self, id: NodeId, value: V) -> Result<(), TreeError> {
        if !self.nodes.is_empty() {
            return Err(TreeError::RootAlreadySet);
        }

        self.nodes.push(Node::new(id, value, None));
        self.slots.insert(id, 0);
        self.last_added = Some(0);
        Ok(())
    }

    /// Attaches a new node with the given id under the node `parent`.
    ///
    /// # Errors
    ///
    /// If the parent is not found in the tree.
    /// If a node with the same id is already in the tree.
    pub fn add(&mut self, parent: NodeId, id: NodeId, value: V) -> Result<(), TreeError> {
        // Cannot duplicate ids
        if self.slots.contains_key(&id) {
            return Err(TreeError::DuplicateNode(id));
        }

        let parent_slot = *self.slots.get(&parent).ok_or(TreeError::OrphanNode(parent))?;

        // Append the child node to the nodes vector and note the location in the map.
        let slot = self.nodes.len();
        self.nodes.push(Node::new(id, value, Some(parent_slot)));
        self.slots.insert(id, slot);
        self.nodes[parent_slot].children.push(slot);
        self.last_added = Some(slot);
        Ok(())
    }

    /// Return the number of nodes in the tree
    #[must_use]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn root(&self) -> Option<&Node<V>> {
        self.nodes.first()
    }

    /// Returns the node with the specified id, if present.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node<V>> {
        self.slots.get(&id).map(|&slot| &self.nodes[slot])
    }

    #[must_use]
    pub fn last_added(&self) -> Option<&Node<V>> {
        self.last_added.map(|slot| &self.nodes[slot])
    }

    /// Returns the parent of the node, or `None` for the root.
    #[must_use]
    pub fn parent(&self, node: &Node<V>) -> Option<&Node<V>> {
        node.parent.map(|slot| &self.nodes[slot])
    }

    /// Returns the children of the node in the order they were attached.
    #[must_use]
    pub fn children<'a>(
        &'a self,
        node: &'a Node<V>,
    ) -> impl Iterator<Item = &'a Node<V>> + 'a {
        node.children.iter().map(move |&slot| &self.nodes[slot])
    }

    /// Iterates over all nodes in insertion order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Node<V>> {
        self.nodes.iter()
    }

    /// Returns a [`DepthFirstIterator`] for the tree
    #[must_use]
    pub fn iter_depth_first(&self) -> DepthFirstIterator<V> {
        DepthFirstIterator::new(self)
    }

    /// Walks from the node up to the root.
    ///
    /// Returns `[node, parent, ..., root]`, backtracking from the root yields only the root.
    ///
    /// # Errors
    ///
    /// If the specified node is not found in the Tree
    pub fn backtrack(&self, id: NodeId) -> Result<Vec<&Node<V>>, TreeError> {
        let mut cur_slot = Some(*self.slots.get(&id).ok_or(TreeError::UnknownNode(id))?);

        // Loop until you get to the root
        let mut nodes = Vec::new();
        while let Some(slot) = cur_slot {
            let node = &self.nodes[slot];
            nodes.push(node);
            cur_slot = node.parent;
        }
        Ok(nodes)
    }
}

impl<V: Clone> Tree<V> {
    /// Returns the values along the path from the root to the specified node.
    ///
    /// # Errors
    ///
    /// If the specified node is not found in the Tree
    pub fn path(&self, id: NodeId) -> Result<Vec<V>, TreeError> {
        // Backtrack yields the path from end to beginning, reverse it to get it in order
        let mut path: Vec<V> = self
            .backtrack(id)?
            .into_iter()
            .map(|node| node.value.clone())
            .collect();
        path.reverse();
        Ok(path)
    }
}

impl<V: Distance> Tree<V> {
    /// Returns the node closest to the specified value, or `None` if the tree is empty.
    ///
    /// Nodes are scanned in insertion order and the first of several equally close
    /// nodes wins, so ties resolve the same way on every run.
    #[must_use]
    pub fn nearest_neighbor(&self, val: &V) -> Option<&Node<V>> {
        self.nodes
            .iter()
            .min_by_key(|node| OrderedFloat(val.distance(&node.value)))
    }
}

//
// Unit tests
//

#[cfg(test)]
mod tests {
    use super::*;

    // Needed for distancing points on a line
    impl Distance for i32 {
        fn distance(&self, other: &Self) -> f64 {
            (self - other).abs().into()
        }
    }

    // Builds a tree whose node ids equal their values
    fn build(root: i32, edges: &[(i32, i32)]) -> Tree<i32> {
        let mut tree = Tree::new();
        tree.add_root(root as NodeId, root).unwrap();
        for &(parent, child) in edges {
            tree.add(parent as NodeId, child as NodeId, child).unwrap();
        }
        tree
    }

    #[test]
    fn test_tree_children() {
        // Construct tree with a single node
        let mut tree: Tree<i32> = Tree::new();
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert!(tree.add_root(1, 1).is_ok());
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.nodes[0].value, 1);

        // Add a child and make sure everything is ok
        assert!(tree.add(1, 2, 2).is_ok());
        assert_eq!(tree.size(), 2);

        // Make the tree bigger
        assert!(tree.add(1, 3, 3).is_ok());
        assert!(tree.add(2, 4, 4).is_ok());
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.last_added().unwrap().id(), 4);

        // Add an existing child and everything is not ok
        assert_eq!(tree.add(1, 2, 2), Err(TreeError::DuplicateNode(2)));

        // Add to a nonexistent parent and everything is not ok
        assert_eq!(tree.add(7, 5, 5), Err(TreeError::OrphanNode(7)));
        assert_eq!(tree.size(), 4);

        let root = tree.root().unwrap();
        let children: Vec<NodeId> = tree.children(root).map(Node::id).collect();
        assert_eq!(children, vec![2, 3]);
        assert!(root.is_root());
        assert!(tree.get(4).unwrap().is_leaf());
        assert_eq!(tree.parent(tree.get(4).unwrap()).unwrap().id(), 2);
        assert!(tree.parent(root).is_none());
    }

    #[test]
    fn test_tree_root_only_once() {
        let mut tree: Tree<i32> = Tree::new();

        // Adding to an empty tree has no parent to attach to
        assert_eq!(tree.add(0, 1, 1), Err(TreeError::OrphanNode(0)));
        assert!(tree.add_root(0, 0).is_ok());
        assert_eq!(tree.add_root(1, 1), Err(TreeError::RootAlreadySet));
        assert_eq!(tree.size(), 1);
    }

    #[test]
    fn test_tree_get_nearest() {
        // Construct tree with many nodes
        let tree = build(1, &[(1, 2), (1, 3), (2, 4), (2, 5), (2, 6)]);

        // Make assertions
        assert_eq!(tree.nearest_neighbor(&7).unwrap().value(), &6);
        assert_eq!(tree.nearest_neighbor(&-1).unwrap().value(), &1);
        assert_eq!(tree.nearest_neighbor(&3).unwrap().value(), &3);
        assert!(Tree::<i32>::new().nearest_neighbor(&3).is_none());
    }

    #[test]
    fn test_tree_nearest_tie_prefers_first_inserted() {
        // 4 and 6 are both 1 away from 5
        let tree = build(0, &[(0, 6), (0, 4)]);
        assert_eq!(tree.nearest_neighbor(&5).unwrap().id(), 6);

        let tree = build(0, &[(0, 4), (0, 6)]);
        assert_eq!(tree.nearest_neighbor(&5).unwrap().id(), 4);
    }

    #[test]
    fn test_tree_dfs() {
        // Construct tree with many nodes
        let tree = build(1, &[(1, 2), (1, 3), (2, 4), (2, 5), (3, 6)]);

        // Expected order
        let expected_dfs_order = vec![1, 2, 4, 5, 3, 6];
        let dfs_order: Vec<i32> = tree.iter_depth_first().map(|n| *n.value()).collect();

        // Compare
        assert_eq!(dfs_order, expected_dfs_order);
        assert_eq!(Tree::<i32>::new().iter_depth_first().count(), 0);
    }

    #[test]
    fn test_tree_backtrack() {
        let tree = build(1, &[(1, 2), (1, 3), (2, 5), (5, 6)]);

        let ids: Vec<NodeId> = tree.backtrack(6).unwrap().iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![6, 5, 2, 1]);

        // From the root there is only the root
        let ids: Vec<NodeId> = tree.backtrack(1).unwrap().iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![1]);

        assert_eq!(tree.backtrack(9).unwrap_err(), TreeError::UnknownNode(9));
    }

    #[test]
    fn test_tree_compute_back_path() {
        // Construct tree with many nodes
        let tree = build(1, &[(1, 2), (1, 3), (2, 4), (2, 5), (3, 7), (5, 6)]);

        // Verify expected paths to different nodes
        let ep1 = vec![1, 2, 5, 6];
        let cp1 = tree.path(6).unwrap();
        assert_eq!(cp1, ep1);

        let ep2 = vec![1, 3, 7];
        let cp2 = tree.path(7).unwrap();
        assert_eq!(cp2, ep2);

        // Invalid node
        assert!(tree.path(8).is_err());
    }

    #[test]
    fn test_tree_edges_and_ancestry() {
        let tree = build(1, &[(1, 2), (1, 3), (2, 4), (4, 5), (3, 6), (6, 7)]);

        // Every non-root node contributes exactly one edge
        let edges: usize = tree.iter().map(|n| n.children.len()).sum();
        assert_eq!(edges, tree.size() - 1);

        // No node is its own ancestor
        for node in tree.iter() {
            let ancestors = tree.backtrack(node.id()).unwrap();
            assert_eq!(ancestors.iter().filter(|a| a.id() == node.id()).count(), 1);
            assert_eq!(ancestors.last().unwrap().id(), 1);
        }
    }
}
