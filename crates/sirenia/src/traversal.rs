//! Ordered walk over a node order: layers, then nodes, then ports clockwise, then edges.
//!
//! Counters that need per-run scratch state (port counts, per-layer flags, ...) register a
//! [`VisitHandler`] and react only to the [`Visit`] stages they care about. One [`traverse`] call
//! feeds every handler in registration order, so several summaries are built from a single
//! pass.

use crate::error::{Error, Result};
use crate::lgraph::{Edge, LayeredGraph, Node, NodeId, NodeKind, Port, PortSide};

#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    Layer {
        index: usize,
        nodes: &'a [NodeId],
    },
    Node {
        layer: usize,
        position: usize,
        node: &'a Node,
    },
    Port {
        node: &'a Node,
        port: &'a Port,
    },
    /// Emitted once per incident port, so an edge between two ports is visited twice.
    Edge {
        port: &'a Port,
        edge: &'a Edge,
    },
}

pub trait VisitHandler {
    fn visit(&mut self, graph: &LayeredGraph, visit: &Visit<'_>);
}

impl<F> VisitHandler for F
where
    F: FnMut(&LayeredGraph, &Visit<'_>),
{
    fn visit(&mut self, graph: &LayeredGraph, visit: &Visit<'_>) {
        self(graph, visit)
    }
}

pub fn traverse(
    graph: &LayeredGraph,
    order: &[Vec<NodeId>],
    handlers: &mut [&mut dyn VisitHandler],
) {
    let mut emit = |visit: Visit<'_>| {
        for handler in handlers.iter_mut() {
            handler.visit(graph, &visit);
        }
    };

    for (index, nodes) in order.iter().enumerate() {
        emit(Visit::Layer { index, nodes });
        for (position, &id) in nodes.iter().enumerate() {
            let node = graph.node(id);
            emit(Visit::Node {
                layer: index,
                position,
                node,
            });
            for port_id in node.ports() {
                let port = graph.port(port_id);
                emit(Visit::Port { node, port });
                for &edge_id in &port.edges {
                    emit(Visit::Edge {
                        port,
                        edge: graph.edge(edge_id),
                    });
                }
            }
        }
    }
}

/// Checks that `order` lists known nodes, each in the layer it belongs to.
pub fn check_order(graph: &LayeredGraph, order: &[Vec<NodeId>]) -> Result<()> {
    if order.len() != graph.layer_count() {
        return Err(Error::OrderLayerCount {
            expected: graph.layer_count(),
            found: order.len(),
        });
    }
    for (ordered, nodes) in order.iter().enumerate() {
        for &node in nodes {
            let actual = graph.get_node(node).ok_or(Error::UnknownNode(node))?.layer;
            if actual != ordered {
                return Err(Error::NodeInWrongLayer {
                    node,
                    ordered,
                    actual,
                });
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerSummary {
    pub node_count: usize,
    pub port_count: usize,
    /// East ports carrying more than one edge.
    pub hyperedge_ports_east: usize,
    /// West ports carrying more than one edge.
    pub hyperedge_ports_west: usize,
    pub has_north_south_dummies: bool,
    pub in_layer_edges: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphSummary {
    pub node_count: usize,
    pub port_count: usize,
    pub layers: Vec<LayerSummary>,
}

impl GraphSummary {
    pub fn collect(graph: &LayeredGraph, order: &[Vec<NodeId>]) -> Result<Self> {
        check_order(graph, order)?;

        let mut layers = vec![LayerSummary::default(); order.len()];
        let mut current = 0;
        let mut port_count = 0;
        let mut node_count = 0;

        let mut counter = |_: &LayeredGraph, visit: &Visit<'_>| match visit {
            Visit::Node { .. } => node_count += 1,
            Visit::Port { .. } => port_count += 1,
            _ => {}
        };

        let mut per_layer = |graph: &LayeredGraph, visit: &Visit<'_>| match *visit {
            Visit::Layer { index, .. } => current = index,
            Visit::Node { node, .. } => {
                let layer = &mut layers[current];
                layer.node_count += 1;
                if node.kind == NodeKind::NorthSouthDummy {
                    layer.has_north_south_dummies = true;
                }
            }
            Visit::Port { port, .. } => {
                let layer = &mut layers[current];
                layer.port_count += 1;
                if port.degree() > 1 {
                    match port.side {
                        PortSide::East => layer.hyperedge_ports_east += 1,
                        PortSide::West => layer.hyperedge_ports_west += 1,
                        PortSide::North | PortSide::South => {}
                    }
                }
            }
            Visit::Edge { port, edge } => {
                if edge.source == port.id
                    && !graph.is_self_loop(edge.id)
                    && graph.is_in_layer(edge.id)
                {
                    layers[current].in_layer_edges += 1;
                }
            }
        };

        let mut handlers: [&mut dyn VisitHandler; 2] = [&mut counter, &mut per_layer];
        traverse(graph, order, &mut handlers);

        Ok(Self {
            node_count,
            port_count,
            layers,
        })
    }

    /// One flag per layer gap: `true` when either facing side has a port with several edges.
    pub fn hyperedge_gaps(&self) -> Vec<bool> {
        self.layers
            .windows(2)
            .map(|pair| pair[0].hyperedge_ports_east > 0 || pair[1].hyperedge_ports_west > 0)
            .collect()
    }
}

pub fn hyperedge_gaps(graph: &LayeredGraph, order: &[Vec<NodeId>]) -> Result<Vec<bool>> {
    Ok(GraphSummary::collect(graph, order)?.hyperedge_gaps())
}
