//! Random chain generation for bench and encode

use anyhow::{ensure, Context, Result};
use auxlist_graph::{NodeArena, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build `count` nodes with payloads `"0data"`, `"1data"`, ... where every
/// node's auxiliary link points at a uniformly chosen node of the chain
pub(crate) fn random_chain(count: usize, seed: u64) -> Result<(NodeArena, NodeId)> {
    ensure!(count > 0, "chain must have at least one node");
    let (mut arena, head) = NodeArena::from_payloads((0..count).map(|i| Some(format!("{i}data"))));
    let head = head.context("empty chain")?;

    let mut rng = StdRng::seed_from_u64(seed);
    let nodes: Vec<NodeId> = arena.chain(head)?.map(|(id, _)| id).collect();
    for &id in &nodes {
        let target = nodes[rng.random_range(0..nodes.len())];
        arena.set_auxiliary(id, Some(target))?;
    }
    Ok((arena, head))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_node_points_into_the_chain() {
        let (arena, head) = random_chain(200, 5).unwrap();
        let nodes: Vec<NodeId> = arena.chain(head).unwrap().map(|(id, _)| id).collect();
        assert_eq!(nodes.len(), 200);
        assert_eq!(arena[head].data(), Some("0data"));
        for &id in &nodes {
            let target = arena[id].auxiliary().unwrap();
            assert!(nodes.contains(&target));
        }
    }

    #[test]
    fn same_seed_same_chain() {
        let (a, head_a) = random_chain(64, 11).unwrap();
        let (b, head_b) = random_chain(64, 11).unwrap();
        let targets = |arena: &NodeArena, head| -> Vec<Option<NodeId>> {
            arena.chain(head).unwrap().map(|(_, n)| n.auxiliary()).collect()
        };
        assert_eq!(targets(&a, head_a), targets(&b, head_b));
    }

    #[test]
    fn zero_nodes_is_rejected() {
        assert!(random_chain(0, 1).is_err());
    }
}
