use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Operator, Policy, PolicyAttribute};
use crate::Error;

/// Index of a node in an [`AccessTree`] arena.
///
/// Ids are assigned in pre-order at construction, so the root is always
/// `NodeId(0)` and every parent precedes its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn as_usize(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
enum NodeKind<A> {
    Leaf(A),
    Gate {
        operator: Operator,
        children: Vec<NodeId>,
    },
}

#[derive(Clone, Debug)]
struct Node<A> {
    kind: NodeKind<A>,
    parent: Option<NodeId>,
    index: usize,
}

/// Arena-backed access tree.
///
/// Immutable once built: parent links and sibling indices are fixed at
/// construction. Each non-root node's index is its 1-based position among
/// its siblings; the root has index 0, which is never an interpolation point.
#[derive(Clone, Debug)]
pub struct AccessTree<A> {
    nodes: Vec<Node<A>>,
}

impl<A: PolicyAttribute> AccessTree<A> {
    /// Lays `policy` out in an arena, pre-order.
    ///
    /// Fails with `BadTreeEncoding` if any gate has no children.
    pub fn from_policy(policy: &Policy<A>) -> Result<Self, Error> {
        let mut tree = Self { nodes: Vec::new() };
        tree.push(policy, None, 0)?;
        Ok(tree)
    }

    fn push(&mut self, policy: &Policy<A>, parent: Option<NodeId>, index: usize) -> Result<NodeId, Error> {
        let id = NodeId(self.nodes.len());
        match policy {
            Policy::Leaf { attribute } => self.nodes.push(Node {
                kind: NodeKind::Leaf(attribute.clone()),
                parent,
                index,
            }),
            Policy::Gate { operator, children } => {
                if children.is_empty() {
                    return Err(Error::BadTreeEncoding(format!(
                        "{operator:?} gate has no children"
                    )));
                }
                self.nodes.push(Node {
                    kind: NodeKind::Gate {
                        operator: *operator,
                        children: Vec::with_capacity(children.len()),
                    },
                    parent,
                    index,
                });
                for (position, child) in children.iter().enumerate() {
                    let child_id = self.push(child, Some(id), position + 1)?;
                    if let NodeKind::Gate { children, .. } = &mut self.nodes[id.0].kind {
                        children.push(child_id);
                    }
                }
            }
        }
        Ok(id)
    }

    /// Rebuilds the owned policy this tree was laid out from.
    pub fn to_policy(&self) -> Policy<A> {
        self.policy_at(self.root())
    }

    fn policy_at(&self, id: NodeId) -> Policy<A> {
        match &self.nodes[id.0].kind {
            NodeKind::Leaf(attribute) => Policy::Leaf {
                attribute: attribute.clone(),
            },
            NodeKind::Gate { operator, children } => Policy::Gate {
                operator: *operator,
                children: children.iter().map(|child| self.policy_at(*child)).collect(),
            },
        }
    }

    /// Evaluates the policy against `present` from the root.
    pub fn satisfy(&self, present: &BTreeSet<A>) -> bool {
        self.satisfy_node(self.root(), present)
    }

    /// A leaf is satisfied iff its attribute is present; a gate iff at least
    /// `threshold` of its children are.
    pub fn satisfy_node(&self, id: NodeId, present: &BTreeSet<A>) -> bool {
        match &self.nodes[id.0].kind {
            NodeKind::Leaf(attribute) => present.contains(attribute),
            NodeKind::Gate { children, .. } => {
                let satisfied = children
                    .iter()
                    .filter(|child| self.satisfy_node(**child, present))
                    .count();
                satisfied >= self.threshold(id)
            }
        }
    }

    /// Every distinct attribute the policy mentions.
    pub fn attributes(&self) -> BTreeSet<&A> {
        self.leaves().map(|(_, attribute)| attribute).collect()
    }
}

impl<A> AccessTree<A> {
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in arena order (parents before children).
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// 0 for the root, otherwise the node's 1-based position among its siblings.
    pub fn index(&self, id: NodeId) -> usize {
        self.nodes[id.0].index
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Leaf and `Or` thresholds are 1; an `And` gate needs every child.
    pub fn threshold(&self, id: NodeId) -> usize {
        match &self.nodes[id.0].kind {
            NodeKind::Leaf(_) => 1,
            NodeKind::Gate {
                operator: Operator::Or,
                ..
            } => 1,
            NodeKind::Gate {
                operator: Operator::And,
                children,
            } => children.len(),
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].kind {
            NodeKind::Leaf(_) => &[],
            NodeKind::Gate { children, .. } => children,
        }
    }

    pub fn operator(&self, id: NodeId) -> Option<Operator> {
        match &self.nodes[id.0].kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Gate { operator, .. } => Some(*operator),
        }
    }

    /// The attribute at `id`, or `None` for a gate.
    pub fn attribute(&self, id: NodeId) -> Option<&A> {
        match &self.nodes[id.0].kind {
            NodeKind::Leaf(attribute) => Some(attribute),
            NodeKind::Gate { .. } => None,
        }
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Leaf(_))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Leaves in arena order, with their attributes.
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &A)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, node)| match &node.kind {
                NodeKind::Leaf(attribute) => Some((NodeId(id), attribute)),
                NodeKind::Gate { .. } => None,
            })
    }
}

impl<A: PartialEq> PartialEq for AccessTree<A> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes.len() == other.nodes.len()
            && self.nodes.iter().zip(&other.nodes).all(|(a, b)| {
                a.parent == b.parent
                    && a.index == b.index
                    && match (&a.kind, &b.kind) {
                        (NodeKind::Leaf(x), NodeKind::Leaf(y)) => x == y,
                        (
                            NodeKind::Gate {
                                operator: op_a,
                                children: ch_a,
                            },
                            NodeKind::Gate {
                                operator: op_b,
                                children: ch_b,
                            },
                        ) => op_a == op_b && ch_a == ch_b,
                        _ => false,
                    }
            })
    }
}

impl<A: Eq> Eq for AccessTree<A> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AccessTree<String> {
        // ("1" OR "2") AND ("3" AND "4")
        let policy = Policy::and(vec![
            Policy::or(vec![Policy::leaf("1"), Policy::leaf("2")]),
            Policy::and(vec![Policy::leaf("3"), Policy::leaf("4")]),
        ]);
        AccessTree::from_policy(&policy).unwrap()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn layout_is_preorder_with_sibling_indices() {
        let tree = sample();
        assert_eq!(tree.len(), 7);
        let root = tree.root();
        assert_eq!(tree.index(root), 0);
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.threshold(root), 2);

        let children = tree.children(root).to_vec();
        assert_eq!(children, vec![NodeId(1), NodeId(4)]);
        assert_eq!(tree.index(children[0]), 1);
        assert_eq!(tree.index(children[1]), 2);
        assert_eq!(tree.threshold(children[0]), 1);
        assert_eq!(tree.threshold(children[1]), 2);

        let leaves: Vec<_> = tree.leaves().map(|(id, a)| (id.as_usize(), a.as_str())).collect();
        assert_eq!(leaves, vec![(2, "1"), (3, "2"), (5, "3"), (6, "4")]);
        for (id, _) in tree.leaves() {
            assert_eq!(tree.threshold(id), 1);
            assert!(tree.parent(id).unwrap() < id);
        }
    }

    #[test]
    fn satisfy_follows_thresholds() {
        let tree = sample();
        assert!(tree.satisfy(&set(&["1", "3", "4"])));
        assert!(tree.satisfy(&set(&["2", "3", "4", "9"])));
        assert!(!tree.satisfy(&set(&["2"])));
        assert!(!tree.satisfy(&set(&["1", "2", "3"])));
        assert!(!tree.satisfy(&set(&[])));
    }

    #[test]
    fn repeated_attributes_get_distinct_leaves() {
        let policy: Policy<String> = Policy::or(vec![
            Policy::leaf("a"),
            Policy::and(vec![Policy::leaf("a"), Policy::leaf("b")]),
        ]);
        let tree = AccessTree::from_policy(&policy).unwrap();
        assert_eq!(tree.leaves().count(), 3);
        assert_eq!(tree.attributes().len(), 2);
    }

    #[test]
    fn empty_gate_is_rejected() {
        let policy: Policy<String> = Policy::and(vec![Policy::leaf("a"), Policy::or(vec![])]);
        assert!(matches!(
            AccessTree::from_policy(&policy),
            Err(Error::BadTreeEncoding(_))
        ));
    }

    #[test]
    fn single_leaf_tree() {
        let tree: AccessTree<usize> = AccessTree::from_policy(&Policy::leaf(3usize)).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_leaf(tree.root()));
        assert_eq!(tree.attribute(tree.root()), Some(&3));
        assert!(tree.satisfy(&BTreeSet::from([3usize])));
        assert!(!tree.satisfy(&BTreeSet::from([2usize])));
    }

    #[test]
    fn structural_equality() {
        assert_eq!(sample(), sample());
        let other: AccessTree<String> = AccessTree::from_policy(&Policy::or(vec![
            Policy::leaf("1"),
            Policy::leaf("2"),
        ]))
        .unwrap();
        assert_ne!(sample(), other);
        assert_eq!(sample().to_policy(), AccessTree::from_policy(&sample().to_policy()).unwrap().to_policy());
    }
}
