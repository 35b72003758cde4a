//! Arena-backed layered graph.
//!
//! Nodes, ports and edges are stored in insertion order and addressed by dense ids. Layers hold
//! the initial top-to-bottom order of their nodes; counting code usually works on a separate
//! `Vec<Vec<NodeId>>` order owned by the caller (see [`LayeredGraph::node_order`]).

mod elements;
mod ids;

pub use elements::{Edge, Node, NodeKind, Port, PortSide, SidePorts};
pub use ids::{EdgeId, NodeId, PortId};

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayeredGraph {
    #[serde(default)]
    layers: Vec<Vec<NodeId>>,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    ports: Vec<Port>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl LayeredGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an empty layer and returns its index.
    pub fn add_layer(&mut self) -> usize {
        self.layers.push(Vec::new());
        self.layers.len() - 1
    }

    /// Appends a normal node to the bottom of `layer`.
    pub fn add_node(&mut self, layer: usize) -> Result<NodeId> {
        self.add_node_of_kind(layer, NodeKind::Normal)
    }

    pub fn add_node_of_kind(&mut self, layer: usize, kind: NodeKind) -> Result<NodeId> {
        let count = self.layers.len();
        let Some(members) = self.layers.get_mut(layer) else {
            return Err(GraphError::UnknownLayer { layer, count });
        };
        let id = NodeId(self.nodes.len());
        members.push(id);
        self.nodes.push(Node {
            id,
            layer,
            kind,
            port_order_fixed: false,
            ports: SidePorts::default(),
        });
        Ok(id)
    }

    /// Appends a port to `side` of `node`.
    ///
    /// Ports are expected in clockwise order per side (see [`SidePorts`]).
    pub fn add_port(&mut self, node: NodeId, side: PortSide) -> Result<PortId> {
        let id = PortId(self.ports.len());
        self.nodes
            .get_mut(node.index())
            .ok_or(GraphError::UnknownNode(node))?
            .ports
            .side_mut(side)
            .push(id);
        self.ports.push(Port {
            id,
            node,
            side,
            edges: Vec::new(),
            origin: None,
        });
        Ok(id)
    }

    pub fn add_edge(&mut self, source: PortId, target: PortId) -> Result<EdgeId> {
        self.check_port(source)?;
        self.check_port(target)?;
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge { id, source, target });
        self.ports[source.index()].edges.push(id);
        if target != source {
            self.ports[target.index()].edges.push(id);
        }
        Ok(id)
    }

    /// Records that dummy port `port` stands in for `origin`.
    pub fn set_origin(&mut self, port: PortId, origin: PortId) -> Result<()> {
        self.check_port(port)?;
        self.check_port(origin)?;
        if port == origin {
            return Err(GraphError::SelfOrigin(port));
        }
        self.ports[port.index()].origin = Some(origin);
        Ok(())
    }

    pub fn set_port_order_fixed(&mut self, node: NodeId, fixed: bool) -> Result<()> {
        self.nodes
            .get_mut(node.index())
            .ok_or(GraphError::UnknownNode(node))?
            .port_order_fixed = fixed;
        Ok(())
    }

    /// Exchanges two ports on the same side of the same node.
    pub fn swap_ports(&mut self, a: PortId, b: PortId) -> Result<()> {
        self.check_port(a)?;
        self.check_port(b)?;
        let (pa, pb) = (&self.ports[a.index()], &self.ports[b.index()]);
        if pa.node != pb.node || pa.side != pb.side {
            return Err(GraphError::PortsNotSwappable { a, b });
        }
        let (node, side) = (pa.node, pa.side);
        let list = self.nodes[node.index()].ports.side_mut(side);
        let ia = list.iter().position(|&p| p == a);
        let ib = list.iter().position(|&p| p == b);
        match (ia, ib) {
            (Some(ia), Some(ib)) => {
                list.swap(ia, ib);
                Ok(())
            }
            _ => Err(GraphError::PortsNotSwappable { a, b }),
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.layers
    }

    /// Panics if `index` is not a layer of this graph.
    pub fn layer(&self, index: usize) -> &[NodeId] {
        &self.layers[index]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Panics on an id that was not handed out by this graph.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id.index()]
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id.index())
    }

    #[inline]
    pub fn port_node(&self, port: PortId) -> &Node {
        self.node(self.port(port).node)
    }

    #[inline]
    pub fn port_layer(&self, port: PortId) -> usize {
        self.port_node(port).layer
    }

    #[inline]
    pub fn other_end(&self, edge: EdgeId, port: PortId) -> PortId {
        self.edge(edge).other_end(port)
    }

    /// Both ends sit on the same node.
    pub fn is_self_loop(&self, edge: EdgeId) -> bool {
        let e = self.edge(edge);
        self.port(e.source).node == self.port(e.target).node
    }

    pub fn is_in_layer(&self, edge: EdgeId) -> bool {
        let e = self.edge(edge);
        self.port_layer(e.source) == self.port_layer(e.target)
    }

    #[inline]
    pub fn degree(&self, port: PortId) -> usize {
        self.port(port).edges.len()
    }

    /// The layers' node lists, as the starting order for a counting session.
    pub fn node_order(&self) -> Vec<Vec<NodeId>> {
        self.layers.clone()
    }

    /// Checks the cross references of a graph that was not assembled through the builder
    /// methods (for example one deserialized from JSON).
    pub fn validate(&self) -> Result<()> {
        check_dense("node", self.nodes.iter().map(|n| n.id.index()))?;
        check_dense("port", self.ports.iter().map(|p| p.id.index()))?;
        check_dense("edge", self.edges.iter().map(|e| e.id.index()))?;

        for (listed, members) in self.layers.iter().enumerate() {
            for &node in members {
                let actual = self.get_node(node).ok_or(GraphError::UnknownNode(node))?.layer;
                if actual != listed {
                    return Err(GraphError::LayerMismatch {
                        node,
                        listed,
                        actual,
                    });
                }
            }
        }

        for node in &self.nodes {
            if node.layer >= self.layers.len() {
                return Err(GraphError::UnknownLayer {
                    layer: node.layer,
                    count: self.layers.len(),
                });
            }
            for side in PortSide::ALL {
                for &port in node.ports_on(side) {
                    let Some(p) = self.get_port(port) else {
                        return Err(dangling(node.id, "port", port.index()));
                    };
                    if p.node != node.id || p.side != side {
                        return Err(GraphError::PortOwnerMismatch {
                            port,
                            node: node.id,
                            side,
                        });
                    }
                }
            }
        }

        for port in &self.ports {
            if self.get_node(port.node).is_none() {
                return Err(dangling(port.id, "node", port.node.index()));
            }
            if !self.node(port.node).ports_on(port.side).contains(&port.id) {
                return Err(GraphError::PortOwnerMismatch {
                    port: port.id,
                    node: port.node,
                    side: port.side,
                });
            }
            for &edge in &port.edges {
                let Some(e) = self.edges.get(edge.index()) else {
                    return Err(dangling(port.id, "edge", edge.index()));
                };
                if e.source != port.id && e.target != port.id {
                    return Err(GraphError::EdgeEndMismatch {
                        edge,
                        port: port.id,
                    });
                }
            }
            match port.origin {
                Some(origin) if origin == port.id => return Err(GraphError::SelfOrigin(port.id)),
                Some(origin) if self.get_port(origin).is_none() => {
                    return Err(dangling(port.id, "port", origin.index()));
                }
                _ => {}
            }
        }

        for edge in &self.edges {
            for end in [edge.source, edge.target] {
                let Some(p) = self.get_port(end) else {
                    return Err(dangling(edge.id, "port", end.index()));
                };
                if !p.edges.contains(&edge.id) {
                    return Err(GraphError::EdgeEndMismatch {
                        edge: edge.id,
                        port: end,
                    });
                }
            }
        }

        Ok(())
    }

    fn check_port(&self, port: PortId) -> Result<()> {
        if port.index() < self.ports.len() {
            Ok(())
        } else {
            Err(GraphError::UnknownPort(port))
        }
    }
}

fn check_dense(kind: &'static str, ids: impl Iterator<Item = usize>) -> Result<()> {
    for (index, id) in ids.enumerate() {
        if index != id {
            return Err(GraphError::NonDenseId { kind, index, id });
        }
    }
    Ok(())
}

fn dangling(owner: impl std::fmt::Display, kind: &'static str, id: usize) -> GraphError {
    GraphError::DanglingReference {
        owner: owner.to_string(),
        kind,
        id,
    }
}
