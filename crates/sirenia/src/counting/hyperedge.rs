use super::LayerGapCounter;
use super::indexing::{assign_source_indices, assign_target_indices, layer_of, leads_to_layer};
use crate::lgraph::{EdgeId, LayeredGraph, NodeId, PortId};
use crate::options::CountingOptions;
use crate::positions::PortPositions;
use crate::tree::AccumulatorTree;
use rustc_hash::FxHashMap as HashMap;
use tracing::trace;

/// Edges bundled at shared ports, with the index extents they cover on either side.
#[derive(Debug, Clone, Default)]
struct Hyperedge {
    id: usize,
    ports: Vec<PortId>,
    edges: Vec<EdgeId>,
    upper_left: usize,
    lower_left: usize,
    upper_right: usize,
    lower_right: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CornerKind {
    Upper,
    Lower,
}

#[derive(Debug, Clone, Copy)]
struct Corner {
    position: usize,
    opposite: usize,
    hyperedge: usize,
    kind: CornerKind,
}

/// Parts of the last estimate computed by [`HyperedgeCrossingApproximator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HyperedgeEstimate {
    pub hyperedges: usize,
    pub edges: usize,
    /// Inversions among the hyperedges' topmost edges.
    pub straight: usize,
    pub left_overlaps: usize,
    pub right_overlaps: usize,
}

impl HyperedgeEstimate {
    pub fn total(&self) -> usize {
        self.straight + self.left_overlaps + self.right_overlaps
    }
}

/// Crossing estimate between two layers when edges sharing a port are drawn as one bundle.
///
/// Each hyperedge is reduced to its topmost edge for an inversion count, and every pair of
/// hyperedges whose extents overlap on one side adds one crossing for that side. The result is
/// an estimate: exact for graphs without shared ports, and never negative.
#[derive(Debug, Clone)]
pub struct HyperedgeCrossingApproximator {
    positions: PortPositions,
    options: CountingOptions,
    records: Vec<Option<Hyperedge>>,
    port_hyperedge: HashMap<PortId, usize>,
    tree: AccumulatorTree,
    corners: Vec<Corner>,
    last: HyperedgeEstimate,
}

impl HyperedgeCrossingApproximator {
    pub fn new(positions: PortPositions, options: CountingOptions) -> Self {
        Self {
            positions,
            options,
            records: Vec::new(),
            port_hyperedge: HashMap::default(),
            tree: AccumulatorTree::default(),
            corners: Vec::new(),
            last: HyperedgeEstimate::default(),
        }
    }

    /// Breakdown of the most recent [`Self::count_crossings`] call.
    pub fn last_estimate(&self) -> HyperedgeEstimate {
        self.last
    }

    pub fn count_crossings(
        &mut self,
        graph: &LayeredGraph,
        left: &[NodeId],
        right: &[NodeId],
    ) -> usize {
        self.last = self.estimate(graph, left, right);
        trace!(
            hyperedges = self.last.hyperedges,
            edges = self.last.edges,
            straight = self.last.straight,
            left_overlaps = self.last.left_overlaps,
            right_overlaps = self.last.right_overlaps,
            "hyperedge estimate"
        );
        self.last.total()
    }

    fn estimate(
        &mut self,
        graph: &LayeredGraph,
        left: &[NodeId],
        right: &[NodeId],
    ) -> HyperedgeEstimate {
        let (Some(left_layer), Some(right_layer)) = (layer_of(graph, left), layer_of(graph, right))
        else {
            return HyperedgeEstimate::default();
        };

        let source_count =
            assign_source_indices(graph, left, right_layer, &self.positions, &self.options);
        let target_count =
            assign_target_indices(graph, right, left_layer, &self.positions, &self.options);

        self.gather(graph, left, right_layer);

        let mut hyperedges: Vec<Hyperedge> = self.records.drain(..).flatten().collect();
        if hyperedges.is_empty() {
            return HyperedgeEstimate::default();
        }

        for he in &mut hyperedges {
            he.upper_left = source_count;
            he.upper_right = target_count;
            he.lower_left = 0;
            he.lower_right = 0;
            for &port in &he.ports {
                let pos = self.positions.get(port);
                let layer = graph.port_layer(port);
                if layer == left_layer {
                    he.upper_left = he.upper_left.min(pos);
                    he.lower_left = he.lower_left.max(pos);
                } else if layer == right_layer {
                    he.upper_right = he.upper_right.min(pos);
                    he.lower_right = he.lower_right.max(pos);
                }
            }
        }

        hyperedges.sort_by_key(|he| (he.upper_left, he.upper_right, he.id));

        let straight = self.count_straight(&hyperedges);
        let left_overlaps = self.count_overlaps(
            hyperedges
                .iter()
                .map(|he| (he.id, he.upper_left, he.lower_left)),
        );
        let right_overlaps = self.count_overlaps(
            hyperedges
                .iter()
                .map(|he| (he.id, he.upper_right, he.lower_right)),
        );

        HyperedgeEstimate {
            hyperedges: hyperedges.len(),
            edges: hyperedges.iter().map(|he| he.edges.len()).sum(),
            straight,
            left_overlaps,
            right_overlaps,
        }
    }

    /// Merges the edges between `left` and `right_layer` into hyperedge records.
    fn gather(&mut self, graph: &LayeredGraph, left: &[NodeId], right_layer: usize) {
        self.records.clear();
        self.port_hyperedge.clear();

        for &id in left {
            for source in graph.node(id).ports() {
                for &edge in &graph.port(source).edges {
                    if !leads_to_layer(graph, edge, source, right_layer) {
                        continue;
                    }
                    let target = graph.other_end(edge, source);
                    let source_he = self.port_hyperedge.get(&source).copied();
                    let target_he = self.port_hyperedge.get(&target).copied();
                    match (source_he, target_he) {
                        (None, None) => {
                            let index = self.records.len();
                            self.records.push(Some(Hyperedge {
                                id: index,
                                ports: vec![source, target],
                                edges: vec![edge],
                                ..Hyperedge::default()
                            }));
                            self.port_hyperedge.insert(source, index);
                            self.port_hyperedge.insert(target, index);
                        }
                        (None, Some(index)) => {
                            self.record(index).edges.push(edge);
                            self.record(index).ports.push(source);
                            self.port_hyperedge.insert(source, index);
                        }
                        (Some(index), None) => {
                            self.record(index).edges.push(edge);
                            self.record(index).ports.push(target);
                            self.port_hyperedge.insert(target, index);
                        }
                        (Some(kept), Some(absorbed)) if kept == absorbed => {
                            self.record(kept).edges.push(edge);
                        }
                        (Some(kept), Some(absorbed)) => {
                            let Some(absorbed_he) = self.records[absorbed].take() else {
                                continue;
                            };
                            for &port in &absorbed_he.ports {
                                self.port_hyperedge.insert(port, kept);
                            }
                            let kept_he = self.record(kept);
                            kept_he.edges.push(edge);
                            kept_he.edges.extend(absorbed_he.edges);
                            kept_he.ports.extend(absorbed_he.ports);
                        }
                    }
                }
            }
        }
    }

    fn record(&mut self, index: usize) -> &mut Hyperedge {
        match self.records[index].as_mut() {
            Some(he) => he,
            None => panic!("hyperedge {index} was merged away but is still referenced"),
        }
    }

    /// Inversions among the upper-right ends, taken in upper-left order.
    fn count_straight(&mut self, sorted: &[Hyperedge]) -> usize {
        // Compress to ranks so hyperedges sharing an upper-right index land on one slot.
        let mut distinct: Vec<usize> = sorted.iter().map(|he| he.upper_right).collect();
        distinct.sort_unstable();
        distinct.dedup();

        self.tree.reset(distinct.len());
        let mut crossings = 0;
        for he in sorted {
            let slot = distinct.partition_point(|&v| v < he.upper_right);
            crossings += self.tree.insert(slot);
        }
        crossings
    }

    /// Sweeps the extents of one side; each closing hyperedge overlaps every one still open.
    fn count_overlaps(&mut self, extents: impl Iterator<Item = (usize, usize, usize)>) -> usize {
        self.corners.clear();
        for (hyperedge, upper, lower) in extents {
            self.corners.push(Corner {
                position: upper,
                opposite: lower,
                hyperedge,
                kind: CornerKind::Upper,
            });
            self.corners.push(Corner {
                position: lower,
                opposite: upper,
                hyperedge,
                kind: CornerKind::Lower,
            });
        }
        // Upper corners sort first among the corners of one hyperedge.
        self.corners
            .sort_unstable_by_key(|c| (c.position, c.opposite, c.hyperedge, c.kind));

        let mut open: usize = 0;
        let mut overlaps = 0;
        for corner in &self.corners {
            match corner.kind {
                CornerKind::Upper => open += 1,
                CornerKind::Lower => {
                    open -= 1;
                    overlaps += open;
                }
            }
        }
        overlaps
    }
}

impl LayerGapCounter for HyperedgeCrossingApproximator {
    fn count_between(&mut self, graph: &LayeredGraph, left: &[NodeId], right: &[NodeId]) -> usize {
        self.count_crossings(graph, left, right)
    }
}
