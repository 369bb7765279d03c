//! Structural comparison of chains
//!
//! Two chains are equivalent when the position-preserving bijection between
//! their nodes also preserves payloads, `next`, `previous` and auxiliary
//! links. Handles themselves are never compared, only the shape they encode.

use crate::error::GraphError;
use crate::node::{NodeArena, NodeId};
use crate::record::WireRecord;
use crate::token::IdentityToken;
use std::collections::HashMap;

/// First difference found between two chains
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Mismatch {
    /// Chains have different lengths
    #[error("chain lengths differ: {left} vs {right}")]
    Length {
        /// Left chain length
        left: usize,
        /// Right chain length
        right: usize,
    },

    /// Payloads differ at a position
    #[error("payload differs at position {0}")]
    Data(usize),

    /// Auxiliary targets differ at a position
    #[error("auxiliary target differs at position {position}: {left:?} vs {right:?}")]
    Auxiliary {
        /// Chain position of the node
        position: usize,
        /// Target position on the left, if any
        left: Option<usize>,
        /// Target position on the right, if any
        right: Option<usize>,
    },

    /// Back link does not mirror the forward link
    #[error("previous link broken at position {0}")]
    Previous(usize),

    /// Auxiliary link leaves the chain
    #[error("auxiliary target of position {0} is not on the chain")]
    OffChain(usize),

    /// Head handle is not valid
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Positional view of one chain
struct Positions<'a> {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    arena: &'a NodeArena,
}

impl<'a> Positions<'a> {
    fn of(arena: &'a NodeArena, head: NodeId) -> Result<Self, GraphError> {
        let ids: Vec<NodeId> = arena.chain(head)?.map(|(id, _)| id).collect();
        let index = ids.iter().enumerate().map(|(pos, id)| (*id, pos)).collect();
        Ok(Self { ids, index, arena })
    }

    fn auxiliary(&self, position: usize) -> Result<Option<usize>, Mismatch> {
        match self.arena[self.ids[position]].auxiliary() {
            None => Ok(None),
            Some(target) => self
                .index
                .get(&target)
                .copied()
                .map(Some)
                .ok_or(Mismatch::OffChain(position)),
        }
    }

    fn previous_ok(&self, position: usize) -> bool {
        let expected = position.checked_sub(1).map(|p| self.ids[p]);
        self.arena[self.ids[position]].previous() == expected
    }
}

/// Check that the chain at `head_b` reproduces the chain at `head_a`
///
/// # Errors
/// Returns the first [`Mismatch`] encountered, walking from the head.
pub fn structurally_equivalent(
    a: &NodeArena,
    head_a: NodeId,
    b: &NodeArena,
    head_b: NodeId,
) -> Result<(), Mismatch> {
    let left = Positions::of(a, head_a)?;
    let right = Positions::of(b, head_b)?;

    if left.ids.len() != right.ids.len() {
        return Err(Mismatch::Length {
            left: left.ids.len(),
            right: right.ids.len(),
        });
    }

    for position in 0..left.ids.len() {
        if a[left.ids[position]].data() != b[right.ids[position]].data() {
            return Err(Mismatch::Data(position));
        }
        if !left.previous_ok(position) || !right.previous_ok(position) {
            return Err(Mismatch::Previous(position));
        }
        let (l, r) = (left.auxiliary(position)?, right.auxiliary(position)?);
        if l != r {
            return Err(Mismatch::Auxiliary {
                position,
                left: l,
                right: r,
            });
        }
    }
    Ok(())
}

/// Auxiliary targets of a record sequence, expressed as chain positions
///
/// Two linearizations of the same graph yield equal patterns even though
/// their literal tokens differ. Targets not defined by any record map to
/// `None` inside `Some`, distinguishing them from absent links.
#[must_use]
pub fn alias_pattern(records: &[WireRecord]) -> Vec<Option<Option<usize>>> {
    let positions: HashMap<IdentityToken, usize> = records
        .iter()
        .enumerate()
        .map(|(pos, record)| (record.id, pos))
        .collect();

    records
        .iter()
        .map(|record| {
            record
                .auxiliary_id
                .map(|token| positions.get(&token).copied())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(payloads: &[&str]) -> (NodeArena, NodeId, Vec<NodeId>) {
        let (arena, head) = NodeArena::from_payloads(payloads.iter().map(|p| Some(*p)));
        let head = head.unwrap();
        let ids = arena.chain(head).unwrap().map(|(id, _)| id).collect();
        (arena, head, ids)
    }

    #[test]
    fn identical_shapes_are_equivalent() {
        let (mut a, ha, ia) = chain(&["a", "b"]);
        let (mut b, hb, ib) = chain(&["a", "b"]);
        a.set_auxiliary(ia[1], Some(ia[0])).unwrap();
        b.set_auxiliary(ib[1], Some(ib[0])).unwrap();
        assert_eq!(structurally_equivalent(&a, ha, &b, hb), Ok(()));
    }

    #[test]
    fn different_auxiliary_is_reported() {
        let (mut a, ha, ia) = chain(&["a", "b"]);
        let (mut b, hb, ib) = chain(&["a", "b"]);
        a.set_auxiliary(ia[1], Some(ia[0])).unwrap();
        b.set_auxiliary(ib[1], Some(ib[1])).unwrap();
        assert_eq!(
            structurally_equivalent(&a, ha, &b, hb),
            Err(Mismatch::Auxiliary {
                position: 1,
                left: Some(0),
                right: Some(1)
            })
        );
    }

    #[test]
    fn payload_and_length_differences_are_reported() {
        let (a, ha, _) = chain(&["a", "b"]);
        let (b, hb, _) = chain(&["a", "c"]);
        let (c, hc, _) = chain(&["a"]);
        assert_eq!(structurally_equivalent(&a, ha, &b, hb), Err(Mismatch::Data(1)));
        assert_eq!(
            structurally_equivalent(&a, ha, &c, hc),
            Err(Mismatch::Length { left: 2, right: 1 })
        );
    }

    #[test]
    fn alias_pattern_ignores_literal_tokens() {
        let t = IdentityToken::from_u128;
        let first = vec![
            WireRecord::new(t(1), Some(t(2)), None),
            WireRecord::new(t(2), None, None),
        ];
        let second = vec![
            WireRecord::new(t(10), Some(t(20)), None),
            WireRecord::new(t(20), None, None),
        ];
        assert_eq!(alias_pattern(&first), alias_pattern(&second));
        assert_eq!(alias_pattern(&first), vec![Some(Some(1)), None]);
    }
}
