//! Chain reconstruction from an ordered record sequence
//!
//! Records are consumed strictly in order. Each record defines one node and
//! appends it to the chain; its auxiliary token is resolved against nodes
//! seen so far. A token referenced before its defining record gets a
//! placeholder node, which is filled in place when the record arrives, so
//! handles already stored elsewhere stay valid.

use crate::error::GraphError;
use crate::node::{NodeArena, NodeId};
use crate::record::WireRecord;
use crate::token::IdentityToken;
use std::collections::HashMap;

/// Incremental chain builder
///
/// Nodes are appended to the borrowed arena as records arrive. If the
/// builder is dropped without a successful [`Reconstructor::finish`], every
/// node it allocated is removed again.
#[derive(Debug)]
pub struct Reconstructor<'a> {
    arena: &'a mut NodeArena,
    start: usize,
    by_token: HashMap<IdentityToken, NodeId>,
    /// Placeholders awaiting their defining record, keyed to first-reference order
    pending: HashMap<IdentityToken, u64>,
    references: u64,
    head: Option<NodeId>,
    prev: Option<NodeId>,
    records: usize,
    committed: bool,
}

impl<'a> Reconstructor<'a> {
    /// Begin rebuilding a chain inside `arena`
    pub fn new(arena: &'a mut NodeArena) -> Self {
        let start = arena.len();
        Self {
            arena,
            start,
            by_token: HashMap::new(),
            pending: HashMap::new(),
            references: 0,
            head: None,
            prev: None,
            records: 0,
            committed: false,
        }
    }

    /// Number of records consumed so far
    #[inline]
    #[must_use]
    pub fn records(&self) -> usize {
        self.records
    }

    /// Number of placeholders still waiting for their defining record
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Consume the next record and append its node to the chain
    ///
    /// # Errors
    /// Returns [`GraphError::DuplicateIdentity`] if the record's id was
    /// already defined by an earlier record. The builder is left unchanged.
    pub fn push(&mut self, record: WireRecord) -> Result<NodeId, GraphError> {
        let WireRecord {
            id,
            auxiliary_id,
            data,
        } = record;

        let node = match self.by_token.get(&id) {
            Some(&existing) => {
                if self.pending.remove(&id).is_none() {
                    return Err(GraphError::DuplicateIdentity(id));
                }
                existing
            }
            None => {
                let node = self.arena.push_placeholder();
                self.by_token.insert(id, node);
                node
            }
        };

        self.arena.set_data_unchecked(node, data);
        match self.prev {
            Some(prev) => self.arena.link_unchecked(prev, node),
            None => self.head = Some(node),
        }

        let auxiliary = auxiliary_id.map(|token| self.resolve(token));
        self.arena.set_auxiliary_unchecked(node, auxiliary);

        self.prev = Some(node);
        self.records += 1;
        Ok(node)
    }

    /// Complete the chain and return its head
    ///
    /// # Errors
    /// - [`GraphError::EmptySequence`] if no record was pushed
    /// - [`GraphError::UnresolvedReference`] if some auxiliary token was never
    ///   defined by a record
    ///
    /// On error the arena is restored to its state before reconstruction.
    pub fn finish(mut self) -> Result<NodeId, GraphError> {
        let head = self.head.ok_or(GraphError::EmptySequence)?;

        if let Some((&token, _)) = self.pending.iter().min_by_key(|(_, order)| **order) {
            let pending = self.pending.len();
            tracing::warn!(%token, pending, "auxiliary reference never defined");
            return Err(GraphError::UnresolvedReference { token, pending });
        }

        tracing::debug!(records = self.records, %head, "chain reconstructed");
        self.committed = true;
        Ok(head)
    }

    fn resolve(&mut self, token: IdentityToken) -> NodeId {
        if let Some(&node) = self.by_token.get(&token) {
            return node;
        }
        let node = self.arena.push_placeholder();
        self.by_token.insert(token, node);
        self.pending.insert(token, self.references);
        self.references += 1;
        node
    }
}

impl Drop for Reconstructor<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.arena.truncate(self.start);
        }
    }
}

/// Rebuild a chain from an in-memory record sequence
///
/// # Errors
/// See [`Reconstructor::push`] and [`Reconstructor::finish`].
pub fn reconstruct<I>(arena: &mut NodeArena, records: I) -> Result<NodeId, GraphError>
where
    I: IntoIterator<Item = WireRecord>,
{
    let mut builder = Reconstructor::new(arena);
    for record in records {
        builder.push(record)?;
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(n: u128) -> IdentityToken {
        IdentityToken::from_u128(n)
    }

    fn record(id: u128, aux: Option<u128>, data: &str) -> WireRecord {
        WireRecord::new(token(id), aux.map(token), Some(data.to_string()))
    }

    #[test]
    fn links_next_and_previous_in_record_order() {
        let mut arena = NodeArena::new();
        let head = reconstruct(
            &mut arena,
            vec![record(1, None, "a"), record(2, None, "b"), record(3, None, "c")],
        )
        .unwrap();

        let chain: Vec<_> = arena.chain(head).unwrap().collect();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].1.previous(), None);
        assert_eq!(chain[1].1.previous(), Some(chain[0].0));
        assert_eq!(chain[2].1.previous(), Some(chain[1].0));
        assert_eq!(chain[2].1.next(), None);
        assert_eq!(chain[2].1.data(), Some("c"));
    }

    #[test]
    fn forward_reference_fills_placeholder_in_place() {
        let mut arena = NodeArena::new();
        let head = reconstruct(
            &mut arena,
            vec![record(1, Some(3), "a"), record(2, None, "b"), record(3, Some(1), "c")],
        )
        .unwrap();

        let ids: Vec<_> = arena.chain(head).unwrap().map(|(id, _)| id).collect();
        assert_eq!(arena[ids[0]].auxiliary(), Some(ids[2]));
        assert_eq!(arena[ids[2]].auxiliary(), Some(ids[0]));
        assert_eq!(arena[ids[2]].data(), Some("c"));
        // No spare nodes: the placeholder became the third node.
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn self_reference_resolves_to_own_node() {
        let mut arena = NodeArena::new();
        let head = reconstruct(&mut arena, vec![record(9, Some(9), "solo")]).unwrap();
        assert_eq!(arena[head].auxiliary(), Some(head));
        assert_eq!(arena[head].next(), None);
    }

    #[test]
    fn absent_data_stays_absent() {
        let mut arena = NodeArena::new();
        let head = reconstruct(&mut arena, vec![WireRecord::new(token(1), None, None)]).unwrap();
        assert_eq!(arena[head].data(), None);
    }

    #[test]
    fn empty_sequence_is_an_error() {
        let mut arena = NodeArena::new();
        assert_eq!(
            reconstruct(&mut arena, Vec::new()).unwrap_err(),
            GraphError::EmptySequence
        );
    }

    #[test]
    fn unresolved_reference_rolls_back_arena() {
        let mut arena = NodeArena::new();
        arena.push(Some("existing".into()));

        let err = reconstruct(
            &mut arena,
            vec![record(1, Some(42), "a"), record(2, Some(43), "b")],
        )
        .unwrap_err();

        assert_eq!(
            err,
            GraphError::UnresolvedReference {
                token: token(42),
                pending: 2
            }
        );
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn duplicate_definition_is_rejected() {
        let mut arena = NodeArena::new();
        let err = reconstruct(&mut arena, vec![record(1, None, "a"), record(1, None, "b")])
            .unwrap_err();
        assert_eq!(err, GraphError::DuplicateIdentity(token(1)));
        assert!(arena.is_empty());
    }

    #[test]
    fn pending_tracks_open_placeholders() {
        let mut arena = NodeArena::new();
        let mut builder = Reconstructor::new(&mut arena);
        builder.push(record(1, Some(2), "a")).unwrap();
        assert_eq!(builder.pending(), 1);
        builder.push(record(2, None, "b")).unwrap();
        assert_eq!(builder.pending(), 0);
        assert_eq!(builder.records(), 2);
        builder.finish().unwrap();
        assert_eq!(arena.len(), 2);
    }
}
