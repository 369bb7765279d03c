//! Arena node model
//!
//! Nodes live in a [`NodeArena`] and refer to each other through [`NodeId`]
//! handles. Handle equality is node identity: two nodes with identical
//! payloads are still distinct unless they share a handle.
//!
//! All mutation goes through the arena, which checks every handle it is
//! given. A link stored in the arena is therefore always in bounds.

use crate::error::GraphError;
use std::fmt::{self, Display, Formatter};
use std::ops::Index;

/// Handle to a node inside one [`NodeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        Self(index as u32)
    }

    /// Position of the node inside its arena
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A list node with a forward link, a back link and an auxiliary link
///
/// `previous` is always derived from `next`; it is never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    data: Option<String>,
    next: Option<NodeId>,
    previous: Option<NodeId>,
    auxiliary: Option<NodeId>,
}

impl Node {
    /// Payload, if any
    #[inline]
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    /// Following node in the chain
    #[inline]
    #[must_use]
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// Preceding node in the chain
    #[inline]
    #[must_use]
    pub fn previous(&self) -> Option<NodeId> {
        self.previous
    }

    /// Auxiliary target, anywhere in the structure
    #[inline]
    #[must_use]
    pub fn auxiliary(&self) -> Option<NodeId> {
        self.auxiliary
    }

    #[inline]
    pub(crate) fn into_data(self) -> Option<String> {
        self.data
    }
}

/// Owner of all nodes of one or more chains
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Create an empty arena
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty arena with room for `capacity` nodes
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Build a linked chain from payloads, returning the arena and its head
    ///
    /// Returns `None` for the head when `payloads` is empty.
    pub fn from_payloads<I, S>(payloads: I) -> (Self, Option<NodeId>)
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let mut arena = Self::new();
        let mut head = None;
        let mut prev: Option<NodeId> = None;
        for payload in payloads {
            let id = arena.push(payload.map(Into::into));
            match prev {
                Some(p) => arena.link_unchecked(p, id),
                None => head = Some(id),
            }
            prev = Some(id);
        }
        (arena, head)
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate an unlinked node carrying `data`
    pub fn push(&mut self, data: Option<String>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node {
            data,
            ..Node::default()
        });
        id
    }

    /// Allocate an empty node to be filled in later
    #[inline]
    pub fn push_placeholder(&mut self) -> NodeId {
        self.push(None)
    }

    /// Look up a node
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Look up a node, failing on a foreign handle
    #[inline]
    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.get(id).ok_or(GraphError::NodeNotFound(id))
    }

    /// Whether `id` refers to a node of this arena
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Replace a node's payload
    pub fn set_data(&mut self, id: NodeId, data: Option<String>) -> Result<(), GraphError> {
        self.check(id)?;
        self.nodes[id.index()].data = data;
        Ok(())
    }

    /// Make `next` follow `prev`, updating both directions
    ///
    /// A node that previously followed `prev` loses its back link, and a
    /// node that previously preceded `next` loses its forward link.
    pub fn link(&mut self, prev: NodeId, next: NodeId) -> Result<(), GraphError> {
        self.check(prev)?;
        self.check(next)?;
        if let Some(old) = self.nodes[prev.index()].next {
            if old != next {
                self.nodes[old.index()].previous = None;
            }
        }
        if let Some(old) = self.nodes[next.index()].previous {
            if old != prev {
                self.nodes[old.index()].next = None;
            }
        }
        self.link_unchecked(prev, next);
        Ok(())
    }

    /// Cut the chain after `id`, clearing the follower's back link
    pub fn unlink_next(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.check(id)?;
        if let Some(next) = self.nodes[id.index()].next.take() {
            self.nodes[next.index()].previous = None;
        }
        Ok(())
    }

    /// Point `id`'s auxiliary link at `target` (or clear it)
    pub fn set_auxiliary(&mut self, id: NodeId, target: Option<NodeId>) -> Result<(), GraphError> {
        self.check(id)?;
        if let Some(t) = target {
            self.check(t)?;
        }
        self.nodes[id.index()].auxiliary = target;
        Ok(())
    }

    /// Iterate the `next` path starting at `head`
    ///
    /// A cyclic `next` path never terminates; chains built through
    /// [`NodeArena::link`] are expected to be acyclic.
    pub fn chain(&self, head: NodeId) -> Result<Chain<'_>, GraphError> {
        self.check(head)?;
        Ok(Chain {
            arena: self,
            current: Some(head),
        })
    }

    /// Number of nodes on the `next` path from `head`
    pub fn chain_len(&self, head: NodeId) -> Result<usize, GraphError> {
        Ok(self.chain(head)?.count())
    }

    pub(crate) fn link_unchecked(&mut self, prev: NodeId, next: NodeId) {
        self.nodes[prev.index()].next = Some(next);
        self.nodes[next.index()].previous = Some(prev);
    }

    pub(crate) fn set_auxiliary_unchecked(&mut self, id: NodeId, target: Option<NodeId>) {
        self.nodes[id.index()].auxiliary = target;
    }

    pub(crate) fn set_data_unchecked(&mut self, id: NodeId, data: Option<String>) {
        self.nodes[id.index()].data = data;
    }

    /// Drop every node allocated at or after `len`
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    #[inline]
    fn check(&self, id: NodeId) -> Result<(), GraphError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound(id))
        }
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

/// Iterator over the `next` path of a chain
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    arena: &'a NodeArena,
    current: Option<NodeId>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = &self.arena[id];
        self.current = node.next;
        Some((id, node))
    }
}
