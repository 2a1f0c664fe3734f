//! Structural validation of per-node edge lists.
//!
//! Used both to vet edge lists handed to constructors and to audit a live graph. On success
//! returns, for every entry, the location of its partner half (`None` for directed graphs).

use crate::error::{check_node, GraphError, Result};
use crate::graph::edge::{EdgeInit, GraphEdge};
use crate::graph::flavour::GraphFlavour;
use crate::graph::weight::WeightHandle;

/// Read-only view of an edge-list entry.
pub(crate) trait EntryView {
    fn target(&self) -> usize;
    fn source(&self) -> Option<usize>;
    fn comp(&self) -> Option<usize>;
    fn inverted(&self) -> bool;
    /// Whether two entries may be the halves of one edge as far as weights go.
    fn same_weight(&self, other: &Self) -> bool;
}

impl<T: PartialEq, M> EntryView for EdgeInit<T, M> {
    fn target(&self) -> usize {
        self.target
    }

    fn source(&self) -> Option<usize> {
        self.source
    }

    fn comp(&self) -> Option<usize> {
        self.complementary_index
    }

    fn inverted(&self) -> bool {
        self.inverted
    }

    fn same_weight(&self, other: &Self) -> bool {
        self.weight == other.weight
    }
}

/// Adapter exposing a stored edge as an [`EntryView`].
pub(crate) struct Stored<'a, E>(pub(crate) &'a E);

impl<E: GraphEdge> EntryView for Stored<'_, E> {
    fn target(&self) -> usize {
        self.0.target()
    }

    fn source(&self) -> Option<usize> {
        self.0.source()
    }

    fn comp(&self) -> Option<usize> {
        self.0.complementary_index()
    }

    fn inverted(&self) -> bool {
        self.0.inverted()
    }

    // Shared halves must alias one value, not merely hold equal ones.
    fn same_weight(&self, other: &Self) -> bool {
        self.0.weight_handle().same_weight(other.0.weight_handle())
    }
}

type Pairing = Vec<Vec<Option<(usize, usize)>>>;

fn invalid(node: usize, index: usize, reason: &'static str) -> GraphError {
    GraphError::InvalidEdgeList {
        node,
        index,
        reason,
    }
}

/// Checks `partitions` against the invariants of `flavour`.
pub(crate) fn validate<V, P>(flavour: GraphFlavour, partitions: &[P]) -> Result<Pairing>
where
    V: EntryView,
    P: AsRef<[V]>,
{
    let order = partitions.len();
    for partition in partitions {
        for entry in partition.as_ref() {
            check_node("from_edges", entry.target(), order)?;
            if let Some(source) = entry.source() {
                check_node("from_edges", source, order)?;
            }
        }
    }

    let mut pairing: Pairing = partitions
        .iter()
        .map(|p| vec![None; p.as_ref().len()])
        .collect();

    for (n, partition) in partitions.iter().enumerate() {
        for (p, entry) in partition.as_ref().iter().enumerate() {
            pairing[n][p] = match flavour {
                GraphFlavour::Directed => None,
                GraphFlavour::Undirected => Some(undirected_partner(partitions, n, p, entry)?),
                GraphFlavour::UndirectedEmbedded | GraphFlavour::DirectedEmbedded => {
                    Some(embedded_partner(flavour, partitions, n, p, entry)?)
                }
            };
        }
    }
    Ok(pairing)
}

/// Pairs the k-th matching entry at one end with the k-th at the other; loops pair up
/// consecutively within their node.
fn undirected_partner<V, P>(
    partitions: &[P],
    n: usize,
    p: usize,
    entry: &V,
) -> Result<(usize, usize)>
where
    V: EntryView,
    P: AsRef<[V]>,
{
    let t = entry.target();
    let matches_at = |host: usize, towards: usize| -> Vec<usize> {
        partitions[host]
            .as_ref()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.target() == towards && e.same_weight(entry))
            .map(|(q, _)| q)
            .collect()
    };

    let here = matches_at(n, t);
    let rank = here.iter().position(|&q| q == p).unwrap_or_default();
    if t == n {
        if here.len() % 2 == 1 {
            return Err(invalid(n, p, "odd number of loop edges"));
        }
        return Ok((n, here[rank ^ 1]));
    }

    let there = matches_at(t, n);
    if there.len() != here.len() {
        return Err(invalid(n, p, "no reciprocal edge with matching weight"));
    }
    Ok((t, there[rank]))
}

fn embedded_partner<V, P>(
    flavour: GraphFlavour,
    partitions: &[P],
    n: usize,
    p: usize,
    entry: &V,
) -> Result<(usize, usize)>
where
    V: EntryView,
    P: AsRef<[V]>,
{
    let c = entry
        .comp()
        .ok_or_else(|| invalid(n, p, "missing complementary index"))?;

    let (source, target) = match flavour {
        GraphFlavour::DirectedEmbedded => (entry.source().unwrap_or(n), entry.target()),
        _ => (n, entry.target()),
    };
    if source != n && target != n {
        return Err(invalid(n, p, "edge hosted at neither endpoint"));
    }
    let other = if source == n { target } else { source };

    if other == n && c == p {
        return Err(invalid(n, p, "self-referential complementary index"));
    }
    let partner = partitions[other]
        .as_ref()
        .get(c)
        .ok_or_else(|| invalid(n, p, "complementary index out of range"))?;
    if partner.comp() != Some(p) {
        return Err(invalid(n, p, "complementary index not reciprocated"));
    }

    match flavour {
        GraphFlavour::DirectedEmbedded => {
            if partner.source().unwrap_or(other) != source || partner.target() != target {
                return Err(invalid(n, p, "partner edge endpoints differ"));
            }
            if source == target && partner.inverted() != entry.inverted() {
                return Err(invalid(n, p, "inverted flags of loop halves differ"));
            }
        }
        _ => {
            if partner.target() != n {
                return Err(invalid(n, p, "partner edge does not point back"));
            }
        }
    }

    if !partner.same_weight(entry) {
        return Err(invalid(n, p, "mismatched weights on partner edges"));
    }
    Ok((other, c))
}

#[cfg(test)]
mod tests {
    use super::*;

    type Init = EdgeInit<i32>;

    fn e(target: usize, weight: i32) -> Init {
        EdgeInit::weighted(target, weight)
    }

    #[test]
    fn test_directed_accepts_anything_in_range() {
        let parts = vec![vec![e(1, 0), e(1, 0)], vec![]];
        let pairing = validate(GraphFlavour::Directed, &parts).unwrap();
        assert_eq!(pairing, vec![vec![None, None], vec![]]);

        let bad = vec![vec![e(2, 0)], vec![]];
        assert!(matches!(
            validate(GraphFlavour::Directed, &bad),
            Err(GraphError::NodeOutOfRange { index: 2, order: 2, .. })
        ));
    }

    #[test]
    fn test_undirected_pairs_in_order() {
        let parts = vec![vec![e(1, 5), e(0, 2), e(1, 5), e(0, 2)], vec![e(0, 5), e(0, 5)]];
        let pairing = validate(GraphFlavour::Undirected, &parts).unwrap();
        assert_eq!(pairing[0][0], Some((1, 0)));
        assert_eq!(pairing[0][2], Some((1, 1)));
        assert_eq!(pairing[0][1], Some((0, 3)));
        assert_eq!(pairing[0][3], Some((0, 1)));
        assert_eq!(pairing[1][1], Some((0, 2)));
    }

    #[test]
    fn test_undirected_rejects_unmatched_weight() {
        let parts = vec![vec![e(1, 5)], vec![e(0, 6)]];
        let err = validate(GraphFlavour::Undirected, &parts).unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidEdgeList {
                node: 0,
                index: 0,
                reason: "no reciprocal edge with matching weight"
            }
        );
    }

    #[test]
    fn test_undirected_rejects_odd_loops() {
        let parts = vec![vec![e(0, 1), e(0, 1), e(0, 1)]];
        assert!(matches!(
            validate(GraphFlavour::Undirected, &parts),
            Err(GraphError::InvalidEdgeList { reason: "odd number of loop edges", .. })
        ));
    }

    #[test]
    fn test_embedded_checks_reciprocation() {
        let good = vec![
            vec![e(1, 3).comp(0), e(0, 1).comp(2), e(0, 1).comp(1)],
            vec![e(0, 3).comp(0)],
        ];
        let pairing = validate(GraphFlavour::UndirectedEmbedded, &good).unwrap();
        assert_eq!(pairing[0][0], Some((1, 0)));
        assert_eq!(pairing[0][1], Some((0, 2)));

        let missing = vec![vec![e(0, 1)]];
        assert!(matches!(
            validate(GraphFlavour::UndirectedEmbedded, &missing),
            Err(GraphError::InvalidEdgeList { reason: "missing complementary index", .. })
        ));

        let selfref = vec![vec![e(0, 1).comp(0)]];
        assert!(matches!(
            validate(GraphFlavour::UndirectedEmbedded, &selfref),
            Err(GraphError::InvalidEdgeList { reason: "self-referential complementary index", .. })
        ));

        let unreciprocated = vec![vec![e(1, 3).comp(0)], vec![e(0, 3).comp(1), e(0, 3).comp(0)]];
        assert!(validate(GraphFlavour::UndirectedEmbedded, &unreciprocated).is_err());
    }

    #[test]
    fn test_directed_embedded_checks_hosting_and_flags() {
        let good = vec![vec![e(1, 0).comp(0)], vec![e(1, 0).from_node(0).comp(0)]];
        assert!(validate(GraphFlavour::DirectedEmbedded, &good).is_ok());

        let stray = vec![vec![e(1, 0).comp(0)], vec![e(2, 0).from_node(2).comp(0)], vec![]];
        assert!(matches!(
            validate(GraphFlavour::DirectedEmbedded, &stray),
            Err(GraphError::InvalidEdgeList { .. })
        ));

        let flags = vec![vec![e(0, 0).comp(1).inverted(), e(0, 0).comp(0)]];
        assert!(matches!(
            validate(GraphFlavour::DirectedEmbedded, &flags),
            Err(GraphError::InvalidEdgeList { reason: "inverted flags of loop halves differ", .. })
        ));
    }

    #[test]
    fn test_stored_shared_halves_must_alias() {
        use crate::graph::edge::{EdgeParts, PartialEdge};
        use crate::graph::weight::Shared;

        let out = PartialEdge::<Shared<i32>>::new(1, 5, ());
        let back = PartialEdge::from_parts(EdgeParts {
            source: 1,
            target: 0,
            complementary_index: 0,
            inverted: false,
            weight: out.weight_handle().partner(),
            meta: (),
        });
        let lookalike = PartialEdge::<Shared<i32>>::new(0, 5, ());

        let aliased = vec![vec![Stored(&out)], vec![Stored(&back)]];
        assert!(validate(GraphFlavour::Undirected, &aliased).is_ok());

        let split = vec![vec![Stored(&out)], vec![Stored(&lookalike)]];
        assert!(matches!(
            validate(GraphFlavour::Undirected, &split),
            Err(GraphError::InvalidEdgeList {
                reason: "no reciprocal edge with matching weight",
                ..
            })
        ));
    }
}
