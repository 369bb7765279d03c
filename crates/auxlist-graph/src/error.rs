//! Error types for graph operations
//!
//! Every error is fatal to the call that produced it. Reconstruction rolls
//! the arena back before returning, so no half-built chain is observable.

use crate::node::NodeId;
use crate::token::IdentityToken;

/// Errors raised while walking, copying or rebuilding a chain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Handle does not belong to this arena
    #[error("node {0} not found in arena")]
    NodeNotFound(NodeId),

    /// An auxiliary reference was never defined by any record
    #[error("unresolved reference to {token} ({pending} placeholder(s) left undefined)")]
    UnresolvedReference {
        /// First unresolved token, in order of first reference
        token: IdentityToken,
        /// Total number of undefined placeholders
        pending: usize,
    },

    /// An auxiliary link targets a node that is not on the copied chain
    #[error("auxiliary target {target} is not on the chain ({pending} such target(s))")]
    DanglingAuxiliary {
        /// Lowest-indexed offending target in the source arena
        target: NodeId,
        /// Total number of off-chain targets
        pending: usize,
    },

    /// The `next` path loops back onto a node already copied
    #[error("next path revisits node {0}")]
    CyclicChain(NodeId),

    /// Two records claimed the same identity
    #[error("identity {0} defined more than once")]
    DuplicateIdentity(IdentityToken),

    /// Record sequence contained no records, so there is no head
    #[error("record sequence is empty")]
    EmptySequence,
}

impl GraphError {
    /// Whether the error is a reference that nothing ever defined
    #[inline]
    #[must_use]
    pub fn is_unresolved_reference(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedReference { .. } | Self::DanglingAuxiliary { .. }
        )
    }

    /// Whether the error points at bad input rather than a bad handle
    #[inline]
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedReference { .. } | Self::DuplicateIdentity(_) | Self::EmptySequence
        )
    }
}
