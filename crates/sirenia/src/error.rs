use crate::lgraph::{GraphError, NodeId};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("node order has {found} layers but the graph has {expected}")]
    OrderLayerCount { expected: usize, found: usize },

    #[error("node {node} is ordered in layer {ordered} but belongs to layer {actual}")]
    NodeInWrongLayer {
        node: NodeId,
        ordered: usize,
        actual: usize,
    },

    #[error("node order refers to unknown node {0}")]
    UnknownNode(NodeId),

    #[error("layer {layer} is not part of the node order ({count} layers)")]
    LayerOutOfRange { layer: usize, count: usize },

    #[error("expected one hyperedge flag per layer gap ({expected}), got {found}")]
    GapFlagCount { expected: usize, found: usize },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type Result<T> = std::result::Result<T, Error>;
