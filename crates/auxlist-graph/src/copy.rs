//! Deep copy
//!
//! Identity assignment and reconstruction fused into one pass: source
//! handles map straight to copy handles through an index-addressed table,
//! so no tokens are generated. The result matches a serialize/deserialize
//! round trip node for node.

use crate::error::GraphError;
use crate::node::{Node, NodeArena, NodeId};

#[derive(Debug, Clone, Copy)]
enum Slot {
    Empty,
    /// Allocated for an auxiliary reference, not yet reached by the walk
    Placeholder(NodeId),
    Defined(NodeId),
}

/// Copy the chain at `head` into the same arena
///
/// The copy's nodes are freshly allocated, so no handle of the result is
/// shared with the source chain.
///
/// # Errors
/// - [`GraphError::NodeNotFound`] if `head` is not in `arena`
/// - [`GraphError::DanglingAuxiliary`] if an auxiliary link leaves the chain
/// - [`GraphError::CyclicChain`] if the `next` path loops
///
/// On error the arena is left as it was.
pub fn deep_copy(arena: &mut NodeArena, head: NodeId) -> Result<NodeId, GraphError> {
    arena.node(head)?;
    let source_len = arena.len();
    copy_chain(arena, source_len, head, |arena, id| arena[id].clone())
}

/// Copy the chain at `head` from `source` into `target`
///
/// # Errors
/// Same as [`deep_copy`]; on error `target` is left as it was.
pub fn deep_copy_into(
    source: &NodeArena,
    head: NodeId,
    target: &mut NodeArena,
) -> Result<NodeId, GraphError> {
    source.node(head)?;
    copy_chain(target, source.len(), head, |_, id| source[id].clone())
}

fn copy_chain<F>(
    target: &mut NodeArena,
    source_len: usize,
    head: NodeId,
    mut read: F,
) -> Result<NodeId, GraphError>
where
    F: FnMut(&NodeArena, NodeId) -> Node,
{
    let start = target.len();
    let result = fill(target, source_len, head, &mut read);
    match result {
        Ok(copy_head) => {
            tracing::debug!(
                nodes = target.len() - start,
                source = %head,
                copy = %copy_head,
                "chain copied"
            );
            Ok(copy_head)
        }
        Err(err) => {
            target.truncate(start);
            Err(err)
        }
    }
}

fn fill<F>(
    target: &mut NodeArena,
    source_len: usize,
    head: NodeId,
    read: &mut F,
) -> Result<NodeId, GraphError>
where
    F: FnMut(&NodeArena, NodeId) -> Node,
{
    let mut slots = vec![Slot::Empty; source_len];
    let mut open = 0usize;
    let mut copy_head = None;
    let mut prev: Option<NodeId> = None;
    let mut current = Some(head);

    while let Some(src) = current {
        let node = read(&*target, src);
        let next = node.next();
        let auxiliary = node.auxiliary();

        let copy = match slots[src.index()] {
            Slot::Empty => target.push_placeholder(),
            Slot::Placeholder(copy) => {
                open -= 1;
                copy
            }
            Slot::Defined(_) => return Err(GraphError::CyclicChain(src)),
        };
        slots[src.index()] = Slot::Defined(copy);

        target.set_data_unchecked(copy, node.into_data());
        match prev {
            Some(p) => target.link_unchecked(p, copy),
            None => copy_head = Some(copy),
        }

        let auxiliary = auxiliary.map(|aux| match slots[aux.index()] {
            Slot::Empty => {
                let placeholder = target.push_placeholder();
                slots[aux.index()] = Slot::Placeholder(placeholder);
                open += 1;
                placeholder
            }
            Slot::Placeholder(copy) | Slot::Defined(copy) => copy,
        });
        target.set_auxiliary_unchecked(copy, auxiliary);

        prev = Some(copy);
        current = next;
    }

    if open > 0 {
        let first = slots
            .iter()
            .position(|slot| matches!(slot, Slot::Placeholder(_)))
            .map(NodeId::from_index)
            .unwrap_or(head);
        return Err(GraphError::DanglingAuxiliary {
            target: first,
            pending: open,
        });
    }

    copy_head.ok_or(GraphError::NodeNotFound(head))
}
