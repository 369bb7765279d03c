//! Testing utilities for auxlist workspace
//!
//! Shared chain fixtures, random chain generation and assertions.

#![allow(missing_docs)]

use auxlist_graph::{structurally_equivalent, NodeArena, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A chain together with the handles of its nodes, in chain order
#[derive(Debug, Clone)]
pub struct Fixture {
    pub arena: NodeArena,
    pub head: NodeId,
    pub nodes: Vec<NodeId>,
}

impl Fixture {
    fn linked<I>(payloads: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let (arena, head) = NodeArena::from_payloads(payloads);
        let head = head.expect("fixture chains are never empty");
        let nodes = handles(&arena, head);
        Self { arena, head, nodes }
    }

    fn point(&mut self, from: usize, to: Option<usize>) {
        let target = to.map(|i| self.nodes[i]);
        self.arena
            .set_auxiliary(self.nodes[from], target)
            .expect("fixture handles are valid");
    }
}

/// Handles of the chain at `head`, in order
pub fn handles(arena: &NodeArena, head: NodeId) -> Vec<NodeId> {
    arena
        .chain(head)
        .expect("head is valid")
        .map(|(id, _)| id)
        .collect()
}

/// first -> second -> third -> fourth
///
/// first.aux = third, second.aux = first, third.aux = first, fourth.aux = none
pub fn four_node_scenario() -> Fixture {
    let mut fixture = Fixture::linked(
        ["first", "second", "third", "fourth"]
            .into_iter()
            .map(|s| Some(s.to_string())),
    );
    fixture.point(0, Some(2));
    fixture.point(1, Some(0));
    fixture.point(2, Some(0));
    fixture
}

/// One node whose auxiliary link points at itself
pub fn self_loop() -> Fixture {
    let mut fixture = Fixture::linked([Some("solo".to_string())]);
    fixture.point(0, Some(0));
    fixture
}

/// `len` nodes, no auxiliary links, payloads `"0data"`, `"1data"`, ...
pub fn plain_chain(len: usize) -> Fixture {
    Fixture::linked((0..len).map(|i| Some(format!("{i}data"))))
}

/// Chain whose every node points at a uniformly chosen node of the chain
pub fn random_chain(len: usize, seed: u64) -> Fixture {
    sparse_random_chain(len, seed, 1.0)
}

/// Chain where each node gets an auxiliary link with probability `density`
///
/// Payloads are absent on roughly one node in eight so the optional
/// payload path is exercised too.
pub fn sparse_random_chain(len: usize, seed: u64, density: f64) -> Fixture {
    let mut rng = StdRng::seed_from_u64(seed);
    let payloads: Vec<Option<String>> = (0..len)
        .map(|i| (rng.random_range(0..8) != 0).then(|| format!("{i}data")))
        .collect();
    let mut fixture = Fixture::linked(payloads);
    for i in 0..len {
        if rng.random_bool(density.clamp(0.0, 1.0)) {
            let target = rng.random_range(0..len);
            fixture.point(i, Some(target));
        }
    }
    fixture
}

/// Panic unless the chain at `actual_head` reproduces the fixture
pub fn assert_reproduces(expected: &Fixture, actual: &NodeArena, actual_head: NodeId) {
    let result = structurally_equivalent(&expected.arena, expected.head, actual, actual_head);
    if let Err(mismatch) = result {
        panic!("reconstructed chain differs: {mismatch}");
    }
}

/// Panic if any node of the chain at `copy_head` is also on the fixture chain
pub fn assert_disjoint(expected: &Fixture, arena: &NodeArena, copy_head: NodeId) {
    for id in handles(arena, copy_head) {
        assert!(
            !expected.nodes.contains(&id),
            "copy shares node {id} with the source"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_node_scenario_shape() {
        let f = four_node_scenario();
        assert_eq!(f.nodes.len(), 4);
        assert_eq!(f.arena[f.nodes[0]].auxiliary(), Some(f.nodes[2]));
        assert_eq!(f.arena[f.nodes[3]].auxiliary(), None);
    }

    #[test]
    fn random_chain_is_reproducible() {
        let a = random_chain(50, 7);
        let b = random_chain(50, 7);
        assert_reproduces(&a, &b.arena, b.head);
    }

    #[test]
    fn random_chain_targets_stay_on_chain() {
        let f = random_chain(100, 3);
        for id in &f.nodes {
            let target = f.arena[*id].auxiliary().unwrap();
            assert!(f.nodes.contains(&target));
        }
    }
}
