#![forbid(unsafe_code)]

//! Layered graph model used by `sirenia`.
//!
//! A [`LayeredGraph`] is an arena: layers, nodes, ports and edges live in flat vectors and refer
//! to each other through dense ids. Counting code only ever reads the model; the layout driver
//! owns it and commits swaps through [`LayeredGraph::swap_ports`] or by permuting its own node
//! order.

pub mod error;
pub mod graph;

pub use error::{GraphError, Result};
pub use graph::{
    Edge, EdgeId, LayeredGraph, Node, NodeId, NodeKind, Port, PortId, PortSide, SidePorts,
};
