use crate::graph::{EdgeId, NodeId, PortId, PortSide};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("layer {layer} does not exist (graph has {count} layers)")]
    UnknownLayer { layer: usize, count: usize },

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("unknown port {0}")]
    UnknownPort(PortId),

    #[error("{kind} stored at index {index} carries id {id}")]
    NonDenseId {
        kind: &'static str,
        index: usize,
        id: usize,
    },

    #[error("{owner} refers to missing {kind} {id}")]
    DanglingReference {
        owner: String,
        kind: &'static str,
        id: usize,
    },

    #[error("node {node} is listed in layer {listed} but belongs to layer {actual}")]
    LayerMismatch {
        node: NodeId,
        listed: usize,
        actual: usize,
    },

    #[error("port {port} is listed on {node} ({side:?}) but does not belong there")]
    PortOwnerMismatch {
        port: PortId,
        node: NodeId,
        side: PortSide,
    },

    #[error("edge {edge} is listed on port {port} but does not end there")]
    EdgeEndMismatch { edge: EdgeId, port: PortId },

    #[error("ports {a} and {b} do not share a node side and cannot be swapped")]
    PortsNotSwappable { a: PortId, b: PortId },

    #[error("port {0} cannot be its own origin")]
    SelfOrigin(PortId),
}

pub type Result<T> = std::result::Result<T, GraphError>;
