//! auxlist graph core
//!
//! Linked lists whose nodes carry an auxiliary link to any node of the
//! list, and the identity-preserving algorithms that copy and linearize
//! them.
//!
//! # Core Concepts
//!
//! - [`NodeArena`]: owner of nodes, addressed by [`NodeId`] handles
//! - [`Linearizer`]: walks a chain once and emits one [`WireRecord`] per node,
//!   naming nodes with [`IdentityToken`]s
//! - [`Reconstructor`]: rebuilds a chain from records, resolving forward
//!   references through placeholder nodes
//! - [`deep_copy`]: both of the above fused into one token-free pass
//!
//! # Example
//!
//! ```
//! use auxlist_graph::{deep_copy, linearize, reconstruct, structurally_equivalent, NodeArena};
//!
//! let (mut arena, head) = NodeArena::from_payloads([Some("a"), Some("b")]);
//! let head = head.unwrap();
//! arena.set_auxiliary(head, Some(head)).unwrap();
//!
//! let records = linearize(&arena, head).unwrap();
//! let mut rebuilt = auxlist_graph::NodeArena::new();
//! let rebuilt_head = reconstruct(&mut rebuilt, records).unwrap();
//! assert!(structurally_equivalent(&arena, head, &rebuilt, rebuilt_head).is_ok());
//!
//! let copy = deep_copy(&mut arena, head).unwrap();
//! assert_ne!(copy, head);
//! ```

mod copy;
mod equivalence;
mod error;
mod linearize;
mod node;
mod reconstruct;
mod record;
mod token;

pub use copy::{deep_copy, deep_copy_into};
pub use equivalence::{alias_pattern, structurally_equivalent, Mismatch};
pub use error::GraphError;
pub use linearize::{linearize, Linearizer};
pub use node::{Chain, Node, NodeArena, NodeId};
pub use reconstruct::{reconstruct, Reconstructor};
pub use record::WireRecord;
pub use token::{IdentityToken, RandomTokens, SequentialTokens, TokenSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
