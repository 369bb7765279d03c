//! Flat per-node record exchanged between the linearizer and the reconstructor

use crate::token::IdentityToken;
use serde::{Deserialize, Serialize};

/// One node of a chain, with links expressed as identity tokens
///
/// `next` is implied by record order and `previous` by its reverse, so
/// only the auxiliary link is carried explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireRecord {
    /// Identity of this node
    pub id: IdentityToken,
    /// Identity of the auxiliary target, if any
    pub auxiliary_id: Option<IdentityToken>,
    /// Payload
    pub data: Option<String>,
}

impl WireRecord {
    /// Create a record
    #[inline]
    #[must_use]
    pub fn new(
        id: IdentityToken,
        auxiliary_id: Option<IdentityToken>,
        data: Option<String>,
    ) -> Self {
        Self {
            id,
            auxiliary_id,
            data,
        }
    }

    /// Whether the auxiliary link points back at this node
    #[inline]
    #[must_use]
    pub fn is_self_referential(&self) -> bool {
        self.auxiliary_id == Some(self.id)
    }
}
