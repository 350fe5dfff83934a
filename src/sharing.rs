//! Polynomial secret sharing over an access tree.
//!
//! Every node `x` gets a polynomial `q_x` of degree `threshold(x) - 1`. The
//! root's constant term is the secret; every other node's constant term is its
//! parent's polynomial evaluated at the node's sibling index. The values that
//! reach the leaves, `q_leaf(0)`, are the shares the schemes bind to
//! attributes.

use rand_core::RngCore;
use tracing::{debug, instrument};

use crate::policy::{AccessTree, NodeId, PolicyAttribute};
use crate::{DensePolynomial, FieldElement};

/// Per-node polynomials produced by [`distribute_secret`], indexed by `NodeId`.
#[derive(Debug)]
pub struct Shares<'t, A, F: FieldElement> {
    tree: &'t AccessTree<A>,
    polys: Vec<DensePolynomial<F>>,
}

impl<'t, A, F: FieldElement> Shares<'t, A, F> {
    pub fn polynomial(&self, id: NodeId) -> &DensePolynomial<F> {
        &self.polys[id.as_usize()]
    }

    /// `q_x(0)` for node `x`.
    pub fn share(&self, id: NodeId) -> F {
        self.polys[id.as_usize()].constant()
    }

    /// `(leaf, attribute, q_leaf(0))` for every leaf, in arena order.
    pub fn leaf_shares(&self) -> impl Iterator<Item = (NodeId, &'t A, F)> + '_ {
        self.tree
            .leaves()
            .map(move |(id, attribute)| (id, attribute, self.share(id)))
    }
}

/// Distributes `secret` over `tree`.
///
/// Nodes are visited exactly once, parents before children (arena order), so
/// a child's constant term is always derived from an already-sampled parent.
#[instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
pub fn distribute_secret<'t, A, F, R>(tree: &'t AccessTree<A>, secret: F, rng: &mut R) -> Shares<'t, A, F>
where
    A: PolicyAttribute,
    F: FieldElement,
    R: RngCore + ?Sized,
{
    let mut polys: Vec<DensePolynomial<F>> = Vec::with_capacity(tree.len());
    for id in tree.node_ids() {
        let constant = match tree.parent(id) {
            None => secret,
            Some(parent) => {
                let x = F::from_u64(tree.index(id) as u64);
                polys[parent.as_usize()].evaluate(&x)
            }
        };
        polys.push(DensePolynomial::random_with_constant(
            rng,
            tree.threshold(id),
            constant,
        ));
    }
    debug!(leaves = tree.leaves().count(), "secret distributed");
    Shares { tree, polys }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::coefficients_at_zero;
    use crate::policy::{Operator, Policy};

    fn sample() -> AccessTree<String> {
        AccessTree::from_policy(&Policy::and(vec![
            Policy::or(vec![Policy::leaf("1"), Policy::leaf("2")]),
            Policy::and(vec![Policy::leaf("3"), Policy::leaf("4"), Policy::leaf("5")]),
        ]))
        .unwrap()
    }

    fn shares_are_consistent<F: FieldElement>(tree: &AccessTree<String>, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let secret = F::random(&mut rng);
        let shares = distribute_secret(tree, secret, &mut rng);

        assert_eq!(shares.polynomial(tree.root()).evaluate(&F::zero()), secret);
        for id in tree.node_ids() {
            assert_eq!(shares.polynomial(id).coeffs().len(), tree.threshold(id));
            if let Some(parent) = tree.parent(id) {
                let x = F::from_u64(tree.index(id) as u64);
                assert_eq!(shares.share(id), shares.polynomial(parent).evaluate(&x));
            }
        }
    }

    fn and_gate_recombines<F: FieldElement>() {
        let tree = sample();
        let mut rng = StdRng::from_entropy();
        let secret = F::random(&mut rng);
        let shares = distribute_secret(&tree, secret, &mut rng);

        let and_gate = tree.children(tree.root())[1];
        let children = tree.children(and_gate);
        let points: Vec<F> = children
            .iter()
            .map(|c| F::from_u64(tree.index(*c) as u64))
            .collect();
        let coeffs = coefficients_at_zero(&points).unwrap();
        let recombined = children
            .iter()
            .zip(&coeffs)
            .fold(F::zero(), |acc, (c, l)| acc + *l * shares.share(*c));
        assert_eq!(recombined, shares.share(and_gate));
    }

    fn or_children_copy_parent<F: FieldElement>() {
        let tree = sample();
        let mut rng = StdRng::from_entropy();
        let shares = distribute_secret(&tree, F::random(&mut rng), &mut rng);
        let or_gate = tree.children(tree.root())[0];
        for child in tree.children(or_gate) {
            assert_eq!(shares.share(*child), shares.share(or_gate));
        }
    }

    fn arb_policy() -> impl Strategy<Value = Policy<String>> {
        let leaf = "[a-d]".prop_map(|label| Policy::Leaf { attribute: label });
        leaf.prop_recursive(3, 16, 3, |inner| {
            (
                prop_oneof![Just(Operator::Or), Just(Operator::And)],
                prop::collection::vec(inner, 1..4),
            )
                .prop_map(|(operator, children)| Policy::Gate { operator, children })
        })
    }

    #[cfg(feature = "blst")]
    mod blst {
        use super::*;

        #[test]
        fn sample_tree_shares() {
            shares_are_consistent::<blstrs::Scalar>(&sample(), 7);
            and_gate_recombines::<blstrs::Scalar>();
            or_children_copy_parent::<blstrs::Scalar>();
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]
            #[test]
            fn arbitrary_tree_shares(policy in arb_policy(), seed in any::<u64>()) {
                let tree = AccessTree::from_policy(&policy).unwrap();
                shares_are_consistent::<blstrs::Scalar>(&tree, seed);
            }
        }
    }

    #[cfg(feature = "ark_bls12381")]
    mod arkworks {
        use super::*;

        #[test]
        fn sample_tree_shares() {
            shares_are_consistent::<ark_bls12_381::Fr>(&sample(), 11);
            and_gate_recombines::<ark_bls12_381::Fr>();
            or_children_copy_parent::<ark_bls12_381::Fr>();
        }
    }
}
