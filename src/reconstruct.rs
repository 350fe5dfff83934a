//! Bottom-up reconstruction of the secret in the exponent of GT.
//!
//! Both scheme families decrypt the same way: each leaf yields a GT value
//! `e(g1, g2)^(k · q_leaf(0))` for some scheme-specific `k`, and each gate
//! interpolates its children's values at zero to obtain
//! `e(g1, g2)^(k · q_gate(0))`. At the root that is `e(g1, g2)^(k · secret)`.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::errors::Error;
use crate::policy::{AccessTree, NodeId, PolicyAttribute};
use crate::{FieldElement, TargetGroup, coefficients_at_zero};

/// Reconstructs the root value of `tree`.
///
/// `leaf_value` returns the scheme's pairing value for a leaf, or
/// `Error::AttributeNotPresent` when the decryptor holds no material for it.
/// Gates absorb such misses as long as `threshold` children still succeed;
/// any other error aborts the whole reconstruction. Sibling subtrees are
/// evaluated in parallel.
///
/// # Errors
///
/// - `Error::PolicyNotSatisfied` if the root cannot be reconstructed
/// - any non-miss error returned by `leaf_value`
pub fn combine<T, A, L>(tree: &AccessTree<A>, leaf_value: &L) -> Result<T, Error>
where
    T: TargetGroup,
    A: PolicyAttribute,
    L: Fn(NodeId, &A) -> Result<T, Error> + Sync,
{
    match combine_node(tree, tree.root(), leaf_value) {
        Err(err) if err.is_soft_miss() => Err(Error::PolicyNotSatisfied),
        other => other,
    }
}

fn combine_node<T, A, L>(tree: &AccessTree<A>, id: NodeId, leaf_value: &L) -> Result<T, Error>
where
    T: TargetGroup,
    A: PolicyAttribute,
    L: Fn(NodeId, &A) -> Result<T, Error> + Sync,
{
    if let Some(attribute) = tree.attribute(id) {
        return leaf_value(id, attribute);
    }

    let children = tree.children(id);
    let results: Vec<Result<T, Error>> = children
        .par_iter()
        .map(|child| combine_node(tree, *child, leaf_value))
        .collect();

    let threshold = tree.threshold(id);
    let mut satisfied = Vec::with_capacity(threshold);
    for (child, result) in children.iter().zip(results) {
        match result {
            Ok(value) => satisfied.push((*child, value)),
            Err(err) if err.is_soft_miss() => {
                trace!(node = child.as_usize(), "child not satisfied");
            }
            Err(err) => return Err(err),
        }
    }

    if satisfied.len() < threshold {
        trace!(
            node = id.as_usize(),
            satisfied = satisfied.len(),
            threshold,
            "gate not satisfied"
        );
        return Err(Error::PolicyNotSatisfied);
    }
    satisfied.truncate(threshold);

    let points: Vec<T::Scalar> = satisfied
        .iter()
        .map(|(child, _)| T::Scalar::from_u64(tree.index(*child) as u64))
        .collect();
    let coeffs = coefficients_at_zero(&points)?;
    let value = satisfied
        .iter()
        .zip(&coeffs)
        .fold(T::identity(), |acc, ((_, value), coeff)| {
            acc.combine(&value.mul_scalar(coeff))
        });
    debug!(node = id.as_usize(), used = threshold, "gate reconstructed");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::policy::Policy;
    use crate::sharing::distribute_secret;
    use crate::{CurvePoint, PairingBackend};

    fn tree() -> AccessTree<String> {
        // ("1" OR "2") AND ("3" AND "4")
        AccessTree::from_policy(&Policy::and(vec![
            Policy::or(vec![Policy::leaf("1"), Policy::leaf("2")]),
            Policy::and(vec![Policy::leaf("3"), Policy::leaf("4")]),
        ]))
        .unwrap()
    }

    /// Leaf values are `base^q_leaf(0)`, so the root must come out as `base^secret`.
    fn reconstructs_for<B: PairingBackend>(held: &[&str], expect_ok: bool) {
        let tree = tree();
        let mut rng = StdRng::from_entropy();
        let secret = B::Scalar::random(&mut rng);
        let shares = distribute_secret(&tree, secret, &mut rng);
        let base = B::pairing(&B::G1::generator(), &B::G2::generator());

        let values: BTreeMap<NodeId, B::Target> = shares
            .leaf_shares()
            .filter(|(_, attribute, _)| held.contains(&attribute.as_str()))
            .map(|(id, _, share)| (id, base.mul_scalar(&share)))
            .collect();
        let result = combine(&tree, &|id: NodeId, _: &String| {
            values.get(&id).copied().ok_or(Error::AttributeNotPresent)
        });

        if expect_ok {
            assert_eq!(result.unwrap(), base.mul_scalar(&secret));
        } else {
            assert!(matches!(result, Err(Error::PolicyNotSatisfied)));
        }
    }

    fn hard_errors_propagate<B: PairingBackend>() {
        let tree = tree();
        let result: Result<B::Target, Error> = combine(&tree, &|_: NodeId, attribute: &String| {
            if attribute == "4" {
                Err(Error::MalformedInput("corrupt leaf".into()))
            } else {
                Ok(B::Target::identity())
            }
        });
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    fn single_leaf_miss_is_policy_failure<B: PairingBackend>() {
        let tree: AccessTree<String> = AccessTree::from_policy(&Policy::leaf("only")).unwrap();
        let result: Result<B::Target, Error> =
            combine(&tree, &|_: NodeId, _: &String| Err(Error::AttributeNotPresent));
        assert!(matches!(result, Err(Error::PolicyNotSatisfied)));
    }

    #[cfg(feature = "blst")]
    mod blst {
        use super::*;
        use crate::BlstBackend;

        #[test]
        fn satisfying_sets_reconstruct() {
            reconstructs_for::<BlstBackend>(&["1", "3", "4"], true);
            reconstructs_for::<BlstBackend>(&["1", "2", "3", "4"], true);
            reconstructs_for::<BlstBackend>(&["2", "3", "4"], true);
        }

        #[test]
        fn unsatisfying_sets_fail() {
            reconstructs_for::<BlstBackend>(&["2"], false);
            reconstructs_for::<BlstBackend>(&["1", "2", "3"], false);
            reconstructs_for::<BlstBackend>(&[], false);
        }

        #[test]
        fn errors_are_classified() {
            hard_errors_propagate::<BlstBackend>();
            single_leaf_miss_is_policy_failure::<BlstBackend>();
        }
    }

    #[cfg(feature = "ark_bls12381")]
    mod arkworks {
        use super::*;
        use crate::ArkworksBls12;

        #[test]
        fn satisfying_sets_reconstruct() {
            reconstructs_for::<ArkworksBls12>(&["1", "3", "4"], true);
            reconstructs_for::<ArkworksBls12>(&["2"], false);
        }

        #[test]
        fn errors_are_classified() {
            hard_errors_propagate::<ArkworksBls12>();
            single_leaf_miss_is_policy_failure::<ArkworksBls12>();
        }
    }
}
