//! Crossings caused by edges attached to the top or bottom of a node.
//!
//! Such an edge is routed through a north/south dummy placed directly above or below its node in
//! the same layer: a vertical stub runs from the node port up (or down) to the dummy's row and
//! then leaves east or west. Stubs cross the horizontal lines of other dummies of the same node
//! and of long-edge dummies passing between the node and its dummies.

use crate::lgraph::{LayeredGraph, NodeId, NodeKind, PortId, PortSide};
use crate::options::CountingOptions;
use crate::positions::PortPositions;
use rustc_hash::FxHashMap as HashMap;

/// First port of `dummy` (clockwise) that routes a node port, together with that port.
fn routed_port(graph: &LayeredGraph, dummy: NodeId) -> Option<(PortId, PortId)> {
    graph
        .node(dummy)
        .ports()
        .find_map(|p| graph.port(p).origin.map(|origin| (p, origin)))
}

/// Maps every node port routed by a north/south dummy of `layer` to that dummy.
fn stub_dummies(graph: &LayeredGraph, layer: &[NodeId], into: &mut HashMap<PortId, NodeId>) {
    into.clear();
    for &id in layer {
        if graph.node(id).kind != NodeKind::NorthSouthDummy {
            continue;
        }
        if let Some((_, origin)) = routed_port(graph, id) {
            into.entry(origin).or_insert(id);
        }
    }
}

/// Counts north/south stub crossings of one layer from per-side port positions and node
/// cardinalities.
#[derive(Debug, Clone)]
pub struct PerpendicularEdgeCounter {
    positions: PortPositions,
    orthogonal_routing: bool,
    /// Position among the layer's nodes, long-edge dummies skipped; indexed by node id.
    node_positions: Vec<usize>,
    north_cardinalities: Vec<usize>,
    south_cardinalities: Vec<usize>,
    stubs: HashMap<PortId, NodeId>,
    current_origin: Option<NodeId>,
    north_of_origin: bool,
    north_south_edges: usize,
    long_edge_dummies: usize,
}

impl PerpendicularEdgeCounter {
    pub fn new(positions: PortPositions, options: &CountingOptions) -> Self {
        Self {
            positions,
            orthogonal_routing: options.orthogonal_routing,
            node_positions: Vec::new(),
            north_cardinalities: Vec::new(),
            south_cardinalities: Vec::new(),
            stubs: HashMap::default(),
            current_origin: None,
            north_of_origin: true,
            north_south_edges: 0,
            long_edge_dummies: 0,
        }
    }

    pub fn count_crossings(&mut self, graph: &LayeredGraph, layer: &[NodeId]) -> usize {
        self.initialize(graph, layer);

        let mut crossings = 0;
        for &node in layer {
            crossings += self.long_edge_dummy_crossings(graph, node);
            crossings += self.stub_crossings(graph, node);
        }
        crossings
    }

    /// Stub crossings of `node` alone, using the positions of the last
    /// [`Self::count_crossings`] call and any [`Self::notify_node_switch`] since.
    pub fn count_node_crossings(&self, graph: &LayeredGraph, node: NodeId) -> usize {
        self.stub_crossings(graph, node)
    }

    /// Keeps node positions valid after the caller swapped two nodes of the counted layer.
    pub fn notify_node_switch(&mut self, a: NodeId, b: NodeId) {
        assert!(
            a.index() < self.node_positions.len() && b.index() < self.node_positions.len(),
            "notify_node_switch({a}, {b}) before count_crossings initialized node positions"
        );
        self.node_positions.swap(a.index(), b.index());
    }

    fn initialize(&mut self, graph: &LayeredGraph, layer: &[NodeId]) {
        let n = graph.node_count();
        for v in [
            &mut self.node_positions,
            &mut self.north_cardinalities,
            &mut self.south_cardinalities,
        ] {
            v.clear();
            v.resize(n, 0);
        }

        let mut next = 0;
        for &id in layer {
            let node = graph.node(id);
            if node.kind != NodeKind::LongEdgeDummy {
                self.node_positions[id.index()] = next;
                next += 1;
            }

            // Both sides west to east.
            let north = node.ports_on(PortSide::North);
            for (i, &port) in north.iter().enumerate() {
                self.positions.set(port, i);
            }
            self.north_cardinalities[id.index()] = north.len();

            let south = node.ports_on(PortSide::South);
            for (i, &port) in south.iter().rev().enumerate() {
                self.positions.set(port, i);
            }
            self.south_cardinalities[id.index()] = south.len();
        }

        stub_dummies(graph, layer, &mut self.stubs);
        self.reset_origin(None);
        self.north_of_origin = true;
    }

    fn reset_origin(&mut self, node: Option<NodeId>) {
        self.current_origin = node;
        self.north_south_edges = 0;
        self.long_edge_dummies = 0;
    }

    /// Long-edge dummies between a node and its own north/south dummies cross those stubs.
    fn long_edge_dummy_crossings(&mut self, graph: &LayeredGraph, id: NodeId) -> usize {
        match graph.node(id).kind {
            NodeKind::NorthSouthDummy => {
                let Some((_, origin)) = routed_port(graph, id) else {
                    return 0;
                };
                let origin_node = graph.port(origin).node;
                if self.current_origin != Some(origin_node) {
                    self.reset_origin(Some(origin_node));
                    // Layers are walked top-down, so a new owner is entered from the north.
                    self.north_of_origin = true;
                }
                if self.north_of_origin {
                    self.north_south_edges += 1;
                    0
                } else {
                    self.long_edge_dummies
                }
            }
            NodeKind::LongEdgeDummy => {
                if self.north_of_origin {
                    self.north_south_edges
                } else {
                    self.long_edge_dummies += 1;
                    0
                }
            }
            NodeKind::Normal => {
                self.reset_origin(Some(id));
                self.north_of_origin = false;
                0
            }
        }
    }

    fn stub_crossings(&self, graph: &LayeredGraph, id: NodeId) -> usize {
        let node = graph.node(id);
        let mut crossings = 0;
        for side in [PortSide::North, PortSide::South] {
            for &port in node.ports_on(side) {
                let Some(&dummy) = self.stubs.get(&port) else {
                    continue;
                };
                let dummy_node = graph.node(dummy);
                let factor = if self.orthogonal_routing {
                    1
                } else {
                    routed_port(graph, dummy).map_or(0, |(p, _)| graph.degree(p))
                };
                let nearness = self.nearness(graph, id, dummy);
                let position = self.positions.get(port);
                if !dummy_node.ports_on(PortSide::East).is_empty() {
                    let east_of_port = self.cardinality(id, side).saturating_sub(position + 1);
                    crossings += factor * east_of_port.min(nearness);
                }
                if !dummy_node.ports_on(PortSide::West).is_empty() {
                    crossings += factor * position.min(nearness);
                }
            }
        }
        crossings
    }

    /// How many of the node's stubs on the dummy's side still reach past the dummy's row.
    fn nearness(&self, graph: &LayeredGraph, node: NodeId, dummy: NodeId) -> usize {
        let Some((_, origin)) = routed_port(graph, dummy) else {
            return 0;
        };
        let cardinality = self.cardinality(node, graph.port(origin).side);
        let distance = self.node_positions[node.index()].abs_diff(self.node_positions[dummy.index()]);
        cardinality.saturating_sub(distance)
    }

    fn cardinality(&self, node: NodeId, side: PortSide) -> usize {
        match side {
            PortSide::North => self.north_cardinalities[node.index()],
            PortSide::South => self.south_cardinalities[node.index()],
            PortSide::East | PortSide::West => 0,
        }
    }
}

/// A pair of positions in the north/south index order, crossing any chord it interleaves with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub from: PortId,
    pub to: PortId,
    pub weight: usize,
}

/// Assigns every north/south stub port and every dummy port of `layer` a position along a
/// top-to-bottom contour and returns the chords connecting them, together with the number of
/// positions used.
///
/// For each normal node the contour runs down the west ports of the dummies above it, along its
/// north ports west to east and back up the east ports of those dummies; below the node it runs
/// along the south ports east to west, down the west ports of the dummies below and back up their
/// east ports. Two edges cross iff their chords interleave.
pub fn north_south_chords(
    graph: &LayeredGraph,
    layer: &[NodeId],
    positions: &PortPositions,
) -> (Vec<Chord>, usize) {
    let mut stubs = HashMap::default();
    stub_dummies(graph, layer, &mut stubs);

    let mut order: Vec<PortId> = Vec::new();
    let mut west: Vec<PortId> = Vec::new();
    let mut east: Vec<PortId> = Vec::new();
    let mut region_owner: Option<NodeId> = None;

    let connected =
        |p: &&PortId| graph.port(**p).edges.iter().any(|&e| !graph.is_self_loop(e));
    let flush = |order: &mut Vec<PortId>, west: &mut Vec<PortId>, east: &mut Vec<PortId>| {
        order.append(west);
        order.extend(east.drain(..).rev());
    };

    for &id in layer {
        let node = graph.node(id);
        match node.kind {
            NodeKind::NorthSouthDummy => {
                let owner = routed_port(graph, id).map(|(_, origin)| graph.port(origin).node);
                if owner != region_owner {
                    flush(&mut order, &mut west, &mut east);
                    region_owner = owner;
                }
                west.extend(node.ports_on(PortSide::West).iter().filter(connected));
                east.extend(node.ports_on(PortSide::East).iter().filter(connected));
            }
            NodeKind::LongEdgeDummy => {
                west.extend(node.ports_on(PortSide::West).iter().filter(connected));
                east.extend(node.ports_on(PortSide::East).iter().filter(connected));
            }
            NodeKind::Normal => {
                if region_owner != Some(id) {
                    flush(&mut order, &mut west, &mut east);
                }
                order.append(&mut west);
                order.extend(
                    node.ports_on(PortSide::North)
                        .iter()
                        .filter(|p| stubs.contains_key(*p)),
                );
                order.extend(east.drain(..).rev());
                order.extend(
                    node.ports_on(PortSide::South)
                        .iter()
                        .filter(|p| stubs.contains_key(*p)),
                );
                region_owner = Some(id);
            }
        }
    }
    flush(&mut order, &mut west, &mut east);

    for (i, &port) in order.iter().enumerate() {
        positions.set(port, i);
    }

    let mut chords = Vec::new();
    for &port in &order {
        let p = graph.port(port);
        match graph.node(p.node).kind {
            NodeKind::Normal => {
                let Some(&dummy) = stubs.get(&port) else {
                    continue;
                };
                for to in graph.node(dummy).ports() {
                    let side = graph.port(to).side;
                    if side != PortSide::East && side != PortSide::West {
                        continue;
                    }
                    let weight = graph
                        .port(to)
                        .edges
                        .iter()
                        .filter(|&&e| !graph.is_self_loop(e))
                        .count();
                    if weight > 0 {
                        chords.push(Chord {
                            from: port,
                            to,
                            weight,
                        });
                    }
                }
            }
            NodeKind::LongEdgeDummy if p.side == PortSide::West => {
                let node = graph.node(p.node);
                if let Some(&to) = node
                    .ports_on(PortSide::East)
                    .iter()
                    .find(|&&q| connected(&&q))
                {
                    chords.push(Chord {
                        from: port,
                        to,
                        weight: 1,
                    });
                }
            }
            _ => {}
        }
    }

    (chords, order.len())
}
