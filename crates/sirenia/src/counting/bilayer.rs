//! Folded inversion counting between and inside layers.
//!
//! Between two layers, the left layer's east ports are numbered top-down and the right layer's
//! west ports continue the numbering bottom-up, as if the right layer were folded under the left
//! one. Every edge becomes an interval over one index sequence, and two edges cross iff their
//! intervals interleave:
//!
//! ```text
//! 0  3          0--
//!  \/           1-+-|
//!  /\    ==>      | |
//! 1  2          2-- |
//!               3----
//! ```
//!
//! Inside a layer the same sweep runs over the ports of one side, numbered top-down.

use super::LayerGapCounter;
use super::indexing::layer_of;
use super::perpendicular::north_south_chords;
use crate::lgraph::{LayeredGraph, NodeId, PortId, PortSide};
use crate::positions::PortPositions;
use crate::tree::OrderStatisticsTree;

/// Ports whose positions were assigned by the last initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Between {
        left: Option<usize>,
        right: Option<usize>,
    },
    InLayer {
        layer: Option<usize>,
        side: PortSide,
    },
}

impl Scope {
    fn contains(self, graph: &LayeredGraph, port: PortId) -> bool {
        let p = graph.port(port);
        let layer = Some(graph.node(p.node).layer);
        match self {
            Scope::Between { left, right } => {
                (p.side == PortSide::East && layer == left)
                    || (p.side == PortSide::West && layer == right)
            }
            Scope::InLayer { layer: l, side } => p.side == side && layer == l,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BilayerCrossingCounter {
    positions: PortPositions,
    tree: OrderStatisticsTree,
    /// Ports on the initialized side, per node id.
    cardinalities: Vec<usize>,
    scope: Option<Scope>,
    ports: Vec<PortId>,
    ends: Vec<usize>,
}

impl BilayerCrossingCounter {
    pub fn new(positions: PortPositions) -> Self {
        Self {
            positions,
            tree: OrderStatisticsTree::default(),
            cardinalities: Vec::new(),
            scope: None,
            ports: Vec::new(),
            ends: Vec::new(),
        }
    }

    pub fn positions(&self) -> &PortPositions {
        &self.positions
    }

    /// Crossings among the edges between `left` and `right`, including in-layer edges on the
    /// facing sides.
    pub fn count_between_layers(
        &mut self,
        graph: &LayeredGraph,
        left: &[NodeId],
        right: &[NodeId],
    ) -> usize {
        self.init_for_counting_between(graph, left, right);
        let ports = std::mem::take(&mut self.ports);
        let crossings = self.count_on_ports(graph, &ports, false);
        self.ports = ports;
        crossings
    }

    /// Crossings of the in-layer edges on `side` of `nodes`, with each other and with the
    /// between-layer edges leaving from the same side.
    pub fn count_in_layer_crossings_on_side(
        &mut self,
        graph: &LayeredGraph,
        nodes: &[NodeId],
        side: PortSide,
    ) -> usize {
        self.init_port_positions_for_in_layer_crossings(graph, nodes, side);
        let ports = std::mem::take(&mut self.ports);
        let crossings = self.count_on_ports(graph, &ports, true);
        self.ports = ports;
        crossings
    }

    pub fn count_in_layer_crossings_on_both_sides(
        &mut self,
        graph: &LayeredGraph,
        nodes: &[NodeId],
    ) -> usize {
        self.count_in_layer_crossings_on_side(graph, nodes, PortSide::East)
            + self.count_in_layer_crossings_on_side(graph, nodes, PortSide::West)
    }

    /// Weighted crossings among north/south stubs and long-edge dummies of `layer`.
    ///
    /// Rewrites positions of north/south ports and dummy ports, so any earlier initialization
    /// for "both orders" queries is dropped.
    pub fn count_north_south_port_crossings_in_layer(
        &mut self,
        graph: &LayeredGraph,
        layer: &[NodeId],
    ) -> usize {
        self.scope = None;
        let (mut chords, len) = north_south_chords(graph, layer, &self.positions);
        if chords.is_empty() {
            return 0;
        }

        let spans: Vec<(usize, usize, usize)> = {
            let mut spans: Vec<_> = chords
                .drain(..)
                .map(|c| {
                    let (a, b) = (self.positions.get(c.from), self.positions.get(c.to));
                    (a.min(b), a.max(b), c.weight)
                })
                .collect();
            spans.sort_unstable();
            spans
        };

        if self.tree.max_key() < len {
            self.tree.reset(len);
        }
        let mut tree = self.tree.scratch();
        let mut crossings = 0;
        let mut next = 0;
        for position in 0..len {
            tree.remove_all(position);
            let start = next;
            while next < spans.len() && spans[next].0 == position {
                let (_, end, weight) = spans[next];
                crossings += tree.rank(end) * weight;
                next += 1;
            }
            for &(_, end, weight) in &spans[start..next] {
                tree.add_many(end, weight);
            }
        }
        crossings
    }

    /// Numbers the facing sides of `left` and `right` for [`Self::switch_ports`] and
    /// [`Self::count_crossings_between_ports_in_both_orders`].
    pub fn init_for_counting_between(
        &mut self,
        graph: &LayeredGraph,
        left: &[NodeId],
        right: &[NodeId],
    ) {
        self.prepare_cardinalities(graph);
        self.ports.clear();
        self.assign(graph, left.iter().copied(), PortSide::East, false);
        self.assign(graph, right.iter().rev().copied(), PortSide::West, false);
        self.tree.reset(self.ports.len());
        self.scope = Some(Scope::Between {
            left: layer_of(graph, left),
            right: layer_of(graph, right),
        });
    }

    /// Numbers `side` of `nodes` top-down for [`Self::switch_nodes`] and
    /// [`Self::count_in_layer_crossings_between_nodes_in_both_orders`].
    pub fn init_port_positions_for_in_layer_crossings(
        &mut self,
        graph: &LayeredGraph,
        nodes: &[NodeId],
        side: PortSide,
    ) {
        self.prepare_cardinalities(graph);
        self.ports.clear();
        self.assign(graph, nodes.iter().copied(), side, side == PortSide::West);
        self.tree.reset(self.ports.len());
        self.scope = Some(Scope::InLayer {
            layer: layer_of(graph, nodes),
            side,
        });
    }

    /// Crossings caused by the edges of `upper` and `lower` (adjacent ports on the facing sides)
    /// in the current order and with the two swapped. Positions are restored before returning.
    ///
    /// Panics unless [`Self::init_for_counting_between`] ran first.
    pub fn count_crossings_between_ports_in_both_orders(
        &mut self,
        graph: &LayeredGraph,
        upper: PortId,
        lower: PortId,
    ) -> (usize, usize) {
        let scope = match self.scope {
            Some(scope @ Scope::Between { .. }) => scope,
            _ => panic!(
                "count_crossings_between_ports_in_both_orders requires init_for_counting_between"
            ),
        };

        let current = self.count_around_ports(graph, scope, upper, lower);
        self.switch_ports(upper, lower);
        let swapped = self.count_around_ports(graph, scope, upper, lower);
        self.switch_ports(lower, upper);
        (current, swapped)
    }

    /// In-layer crossings on `side` caused by the edges of the adjacent nodes `upper` and
    /// `lower`, in the current order and with the two swapped. Positions are restored before
    /// returning.
    ///
    /// Panics unless [`Self::init_port_positions_for_in_layer_crossings`] ran for `side`.
    pub fn count_in_layer_crossings_between_nodes_in_both_orders(
        &mut self,
        graph: &LayeredGraph,
        upper: NodeId,
        lower: NodeId,
        side: PortSide,
    ) -> (usize, usize) {
        let scope = match self.scope {
            Some(scope @ Scope::InLayer { side: s, .. }) if s == side => scope,
            _ => panic!(
                "count_in_layer_crossings_between_nodes_in_both_orders requires \
                 init_port_positions_for_in_layer_crossings for the {side:?} side"
            ),
        };

        let current = self.count_around_nodes(graph, scope, upper, lower, side);
        self.switch_nodes(graph, upper, lower, side);
        let swapped = self.count_around_nodes(graph, scope, upper, lower, side);
        self.switch_nodes(graph, lower, upper, side);
        (current, swapped)
    }

    /// Records that the caller swapped two ports.
    pub fn switch_ports(&mut self, a: PortId, b: PortId) {
        self.positions.swap(a, b);
    }

    /// Records that `was_upper` and `was_lower`, adjacent in a layer numbered top-down on
    /// `side`, swapped places.
    pub fn switch_nodes(
        &mut self,
        graph: &LayeredGraph,
        was_upper: NodeId,
        was_lower: NodeId,
        side: PortSide,
    ) {
        assert!(
            self.scope.is_some(),
            "switch_nodes requires an initialized port numbering"
        );
        let upper_cardinality = self.cardinalities[was_upper.index()];
        let lower_cardinality = self.cardinalities[was_lower.index()];
        for &port in graph.node(was_upper).ports_on(side) {
            self.positions
                .set(port, self.positions.get(port) + lower_cardinality);
        }
        for &port in graph.node(was_lower).ports_on(side) {
            self.positions
                .set(port, self.positions.get(port) - upper_cardinality);
        }
    }

    fn prepare_cardinalities(&mut self, graph: &LayeredGraph) {
        self.cardinalities.clear();
        self.cardinalities.resize(graph.node_count(), 0);
    }

    /// Appends the `side` ports of `nodes` to the numbering. Side lists are clockwise, so
    /// `reverse_ports` turns a west side top-down.
    fn assign(
        &mut self,
        graph: &LayeredGraph,
        nodes: impl Iterator<Item = NodeId>,
        side: PortSide,
        reverse_ports: bool,
    ) {
        for id in nodes {
            let ports = graph.node(id).ports_on(side);
            self.cardinalities[id.index()] = ports.len();
            let mut push = |port: PortId| {
                self.positions.set(port, self.ports.len());
                self.ports.push(port);
            };
            if reverse_ports {
                ports.iter().rev().copied().for_each(&mut push);
            } else {
                ports.iter().copied().for_each(&mut push);
            }
        }
    }

    fn count_around_ports(
        &mut self,
        graph: &LayeredGraph,
        scope: Scope,
        upper: PortId,
        lower: PortId,
    ) -> usize {
        let mut ports = std::mem::take(&mut self.ports);
        ports.clear();
        for port in [upper, lower] {
            ports.push(port);
            for &edge in &graph.port(port).edges {
                if graph.is_self_loop(edge) {
                    continue;
                }
                let other = graph.other_end(edge, port);
                if scope.contains(graph, other) {
                    ports.push(other);
                }
            }
        }
        self.sort_by_position(&mut ports);
        let crossings = self.count_on_ports(graph, &ports, false);
        self.ports = ports;
        crossings
    }

    fn count_around_nodes(
        &mut self,
        graph: &LayeredGraph,
        scope: Scope,
        upper: NodeId,
        lower: NodeId,
        side: PortSide,
    ) -> usize {
        let mut ports = std::mem::take(&mut self.ports);
        ports.clear();
        for node in [upper, lower] {
            for &port in graph.node(node).ports_on(side) {
                for &edge in &graph.port(port).edges {
                    if graph.is_self_loop(edge) {
                        continue;
                    }
                    ports.push(port);
                    let other = graph.other_end(edge, port);
                    if graph.is_in_layer(edge) && scope.contains(graph, other) {
                        ports.push(other);
                    }
                }
            }
        }
        self.sort_by_position(&mut ports);
        let crossings = self.count_on_ports(graph, &ports, true);
        self.ports = ports;
        crossings
    }

    fn sort_by_position(&self, ports: &mut Vec<PortId>) {
        ports.sort_unstable_by_key(|&p| (self.positions.get(p), p));
        ports.dedup();
    }

    /// Sweeps `ports` in position order. Each port first closes the edges ending at it, then
    /// opens its edges running further down; an opened edge crosses every open edge ending
    /// before it.
    ///
    /// With `in_layer`, edges leaving the scope's layer are not swept; instead each one crosses
    /// every edge open at its port.
    fn count_on_ports(&mut self, graph: &LayeredGraph, ports: &[PortId], in_layer: bool) -> usize {
        let Some(scope) = self.scope else {
            return 0;
        };
        let mut tree = self.tree.scratch();
        let mut crossings = 0;
        for &port in ports {
            let position = self.positions.get(port);
            tree.remove_all(position);
            let mut between_layer_edges = 0;
            for &edge in &graph.port(port).edges {
                if graph.is_self_loop(edge) {
                    continue;
                }
                let other = graph.other_end(edge, port);
                if !scope.contains(graph, other) {
                    if in_layer && !graph.is_in_layer(edge) {
                        between_layer_edges += 1;
                    }
                    continue;
                }
                let end = self.positions.get(other);
                if end > position {
                    crossings += tree.rank(end);
                    self.ends.push(end);
                }
            }
            if in_layer {
                crossings += tree.size() * between_layer_edges;
            }
            for end in self.ends.drain(..) {
                tree.add(end);
            }
        }
        crossings
    }
}

impl LayerGapCounter for BilayerCrossingCounter {
    fn count_between(&mut self, graph: &LayeredGraph, left: &[NodeId], right: &[NodeId]) -> usize {
        self.count_between_layers(graph, left, right)
    }

    fn counts_in_layer_edges(&self) -> bool {
        true
    }
}
