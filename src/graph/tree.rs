use crate::error::{SegError, SegResult};
use crate::graph::WeightedGraph;

/// Rooted tree storing both parent links and child lists.
///
/// Nodes that were never attached (e.g. vertices an MST could not reach)
/// have no parent and are *not* the root; `is_attached` tells them apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: usize,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    attached: Vec<bool>,
}

impl Tree {
    pub fn new(root: usize, size: usize) -> SegResult<Self> {
        if root >= size {
            return Err(SegError::Validation(format!(
                "tree root {} is out of range for {} nodes",
                root, size
            )));
        }
        let mut attached = vec![false; size];
        attached[root] = true;
        Ok(Self {
            root,
            parent: vec![None; size],
            children: vec![Vec::new(); size],
            attached,
        })
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn parent(&self, node: usize) -> Option<usize> {
        self.parent[node]
    }

    pub fn children(&self, node: usize) -> &[usize] {
        &self.children[node]
    }

    pub fn is_attached(&self, node: usize) -> bool {
        self.attached[node]
    }

    /// Re-hangs `node` under `parent`, detaching it from any previous parent.
    pub fn set_parent(&mut self, node: usize, parent: usize) -> SegResult<()> {
        let size = self.len();
        if node >= size || parent >= size {
            return Err(SegError::Validation(format!(
                "edge {} -> {} is out of range for {} nodes",
                node, parent, size
            )));
        }
        if node == parent {
            return Err(SegError::Validation(format!(
                "node {} cannot be its own parent",
                node
            )));
        }
        if node == self.root {
            return Err(SegError::Validation(format!(
                "root {} cannot be given a parent",
                node
            )));
        }

        if let Some(old) = self.parent[node] {
            self.children[old].retain(|&c| c != node);
        }
        self.parent[node] = Some(parent);
        self.children[parent].push(node);
        self.attached[node] = true;
        Ok(())
    }

    /// Nodes that are neither the root nor hung below it.
    pub fn unreachable_nodes(&self) -> Vec<usize> {
        (0..self.len()).filter(|&n| !self.attached[n]).collect()
    }

    pub fn is_spanning(&self) -> bool {
        self.attached.iter().all(|&a| a)
    }

    /// `(child, parent)` pairs, one per tree edge.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.parent
            .iter()
            .enumerate()
            .filter_map(|(c, p)| p.map(|p| (c, p)))
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn total_weight(&self, graph: &WeightedGraph) -> f32 {
        self.edges()
            .map(|(c, p)| graph.weight(c, p).unwrap_or(0.0))
            .sum()
    }

    /// Nodes reachable from the root, parents always before their children.
    pub fn preorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = vec![self.root];
        let mut seen = vec![false; self.len()];
        while let Some(node) = stack.pop() {
            if seen[node] {
                continue;
            }
            seen[node] = true;
            order.push(node);
            stack.extend(self.children[node].iter().rev().copied());
        }
        order
    }

    /// Number of direct and indirect descendants of every node.
    pub fn subtree_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.len()];
        for &node in self.preorder().iter().rev() {
            if let Some(p) = self.parent[node] {
                sizes[p] += sizes[node] + 1;
            }
        }
        sizes
    }

    /// Checks that parent and child links agree and that the attached
    /// nodes form a single acyclic tree under the root.
    pub fn validate(&self) -> SegResult<()> {
        if self.parent[self.root].is_some() {
            return Err(SegError::Validation("root has a parent".into()));
        }

        let mut listed = vec![false; self.len()];
        for (p, kids) in self.children.iter().enumerate() {
            for &c in kids {
                if c == p {
                    return Err(SegError::Validation(format!("node {} is its own child", c)));
                }
                if listed[c] {
                    return Err(SegError::Validation(format!("node {} has two parents", c)));
                }
                listed[c] = true;
                if self.parent[c] != Some(p) {
                    return Err(SegError::Validation(format!(
                        "node {} is listed under {} but points to {:?}",
                        c, p, self.parent[c]
                    )));
                }
            }
        }
        for (c, p) in self.edges() {
            if !listed[c] {
                return Err(SegError::Validation(format!(
                    "node {} points to {} but is not among its children",
                    c, p
                )));
            }
        }

        let attached = self.attached.iter().filter(|&&a| a).count();
        let reached = self.preorder().len();
        if reached != attached || self.edge_count() + 1 != attached {
            return Err(SegError::Validation(format!(
                "tree reaches {} of {} attached nodes with {} edges",
                reached,
                attached,
                self.edge_count()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Tree {
        let mut t = Tree::new(0, n).unwrap();
        for i in 1..n {
            t.set_parent(i, i - 1).unwrap();
        }
        t
    }

    #[test]
    fn test_reparenting_keeps_children_consistent() {
        let mut t = Tree::new(0, 3).unwrap();
        t.set_parent(1, 0).unwrap();
        t.set_parent(2, 0).unwrap();
        t.set_parent(2, 1).unwrap();

        assert_eq!(t.children(0), &[1]);
        assert_eq!(t.children(1), &[2]);
        assert_eq!(t.parent(2), Some(1));
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_self_parent_rejected() {
        let mut t = Tree::new(0, 2).unwrap();
        assert!(t.set_parent(1, 1).is_err());
        assert!(t.set_parent(0, 1).is_err());
    }

    #[test]
    fn test_subtree_sizes_on_chain() {
        let t = chain(5);
        assert_eq!(t.subtree_sizes(), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let t = chain(200_000);
        assert_eq!(t.preorder().len(), 200_000);
        assert_eq!(t.subtree_sizes()[0], 199_999);
    }

    #[test]
    fn test_unattached_nodes_are_reported() {
        let mut t = Tree::new(1, 4).unwrap();
        t.set_parent(0, 1).unwrap();
        assert_eq!(t.unreachable_nodes(), vec![2, 3]);
        assert!(!t.is_spanning());
        assert!(t.validate().is_ok());
        assert_eq!(t.parent(2), None);
        assert_ne!(t.root(), 2);
    }
}
