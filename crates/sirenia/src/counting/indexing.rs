//! Index assignment shared by the accumulator-tree counters.
//!
//! Left-layer ports get *source* indices in clockwise order. Right-layer ports get *target*
//! indices in north, west, south, east order, which follows the physical top-to-bottom order of
//! the edge ends entering the node. Nodes whose port order may still change collapse all their
//! ports onto one shared index.

use crate::lgraph::{EdgeId, LayeredGraph, Node, NodeId, PortId, PortSide};
use crate::options::CountingOptions;
use crate::positions::PortPositions;

/// The layer of the first node, or `None` for an empty slice.
pub(crate) fn layer_of(graph: &LayeredGraph, nodes: &[NodeId]) -> Option<usize> {
    nodes.first().map(|&n| graph.node(n).layer)
}

pub(crate) fn port_order_fixed(node: &Node, options: &CountingOptions) -> bool {
    options.assume_fixed_port_order || node.port_order_fixed
}

/// Whether `edge`, seen from `port`, leaves for layer `other_layer`. Self-loops never do.
#[inline]
pub(crate) fn leads_to_layer(
    graph: &LayeredGraph,
    edge: EdgeId,
    port: PortId,
    other_layer: usize,
) -> bool {
    !graph.is_self_loop(edge) && graph.port_layer(graph.other_end(edge, port)) == other_layer
}

fn gap_degree(graph: &LayeredGraph, port: PortId, other_layer: usize) -> usize {
    graph
        .port(port)
        .edges
        .iter()
        .filter(|&&e| leads_to_layer(graph, e, port, other_layer))
        .count()
}

/// Writes source indices for the ports of `left` that have an edge into `right_layer` and
/// returns the number of distinct indices.
pub(crate) fn assign_source_indices(
    graph: &LayeredGraph,
    left: &[NodeId],
    right_layer: usize,
    positions: &PortPositions,
    options: &CountingOptions,
) -> usize {
    let mut source_count = 0;
    for &id in left {
        let node = graph.node(id);
        if port_order_fixed(node, options) {
            for port in node.ports() {
                if gap_degree(graph, port, right_layer) > 0 {
                    positions.set(port, source_count);
                    source_count += 1;
                }
            }
        } else {
            let mut connected = false;
            for port in node.ports() {
                if gap_degree(graph, port, right_layer) > 0 {
                    positions.set(port, source_count);
                    connected = true;
                }
            }
            if connected {
                source_count += 1;
            }
        }
    }
    source_count
}

/// Writes target indices for the ports of `right` that have an edge from `left_layer` and
/// returns the number of distinct indices.
pub(crate) fn assign_target_indices(
    graph: &LayeredGraph,
    right: &[NodeId],
    left_layer: usize,
    positions: &PortPositions,
    options: &CountingOptions,
) -> usize {
    let mut target_count = 0;
    for &id in right {
        let node = graph.node(id);
        if port_order_fixed(node, options) {
            let north_inputs = node
                .ports_on(PortSide::North)
                .iter()
                .filter(|&&p| gap_degree(graph, p, left_layer) > 0)
                .count();
            let mut other_inputs = 0;
            // Reverse clockwise: west top-down, south west-to-east, east bottom-up, then north.
            for port in node.ports().rev() {
                if gap_degree(graph, port, left_layer) == 0 {
                    continue;
                }
                if graph.port(port).side == PortSide::North {
                    positions.set(port, target_count);
                    target_count += 1;
                } else {
                    positions.set(port, target_count + north_inputs + other_inputs);
                    other_inputs += 1;
                }
            }
            target_count += other_inputs;
        } else {
            let mut connected = false;
            for port in node.ports() {
                if gap_degree(graph, port, left_layer) > 0 {
                    positions.set(port, target_count);
                    connected = true;
                }
            }
            if connected {
                target_count += 1;
            }
        }
    }
    target_count
}
