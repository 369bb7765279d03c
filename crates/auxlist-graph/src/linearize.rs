//! Identity assignment
//!
//! Walks the `next` path once and emits one [`WireRecord`] per node. A node
//! receives its token the first time it is referenced, either as the head,
//! as somebody's `next`, or as somebody's auxiliary target. Reference-equal
//! nodes therefore always share a token and distinct nodes never do.

use crate::error::GraphError;
use crate::node::{NodeArena, NodeId};
use crate::record::WireRecord;
use crate::token::{IdentityToken, RandomTokens, TokenSource};
use std::collections::HashMap;
use std::iter::FusedIterator;

/// Lazy record producer over one chain
///
/// # Example
/// ```
/// use auxlist_graph::{Linearizer, NodeArena, SequentialTokens};
///
/// let (mut arena, head) = NodeArena::from_payloads([Some("a"), Some("b")]);
/// let head = head.unwrap();
/// arena.set_auxiliary(head, Some(head)).unwrap();
///
/// let records: Vec<_> = Linearizer::new(&arena, head, SequentialTokens::new())
///     .unwrap()
///     .collect();
/// assert_eq!(records.len(), 2);
/// assert!(records[0].is_self_referential());
/// ```
#[derive(Debug)]
pub struct Linearizer<'a, T> {
    arena: &'a NodeArena,
    tokens: T,
    ids: HashMap<NodeId, IdentityToken>,
    current: Option<NodeId>,
}

impl<'a, T: TokenSource> Linearizer<'a, T> {
    /// Start a walk at `head`
    ///
    /// # Errors
    /// Returns [`GraphError::NodeNotFound`] if `head` is not in `arena`.
    pub fn new(arena: &'a NodeArena, head: NodeId, tokens: T) -> Result<Self, GraphError> {
        arena.node(head)?;
        let mut linearizer = Self {
            arena,
            tokens,
            ids: HashMap::new(),
            current: Some(head),
        };
        // The head needs a token even if nothing ever points at it.
        linearizer.token_for(head);
        Ok(linearizer)
    }

    /// Number of distinct nodes that have been assigned a token so far
    #[inline]
    #[must_use]
    pub fn assigned(&self) -> usize {
        self.ids.len()
    }

    fn token_for(&mut self, id: NodeId) -> IdentityToken {
        let tokens = &mut self.tokens;
        *self.ids.entry(id).or_insert_with(|| tokens.next_token())
    }
}

impl<T: TokenSource> Iterator for Linearizer<'_, T> {
    type Item = WireRecord;

    fn next(&mut self) -> Option<WireRecord> {
        let current = self.current?;
        let arena = self.arena;
        let node = &arena[current];

        let id = self.token_for(current);
        if let Some(next) = node.next() {
            self.token_for(next);
        }
        let auxiliary_id = node.auxiliary().map(|target| self.token_for(target));

        self.current = node.next();
        Some(WireRecord::new(id, auxiliary_id, node.data().map(str::to_owned)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::from(self.current.is_some()), None)
    }
}

impl<T: TokenSource> FusedIterator for Linearizer<'_, T> {}

/// Collect every record of the chain at `head`, using random tokens
///
/// # Errors
/// Returns [`GraphError::NodeNotFound`] if `head` is not in `arena`.
pub fn linearize(arena: &NodeArena, head: NodeId) -> Result<Vec<WireRecord>, GraphError> {
    Ok(Linearizer::new(arena, head, RandomTokens)?.collect())
}
