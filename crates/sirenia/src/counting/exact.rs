use super::LayerGapCounter;
use super::indexing::{
    assign_target_indices, layer_of, leads_to_layer, port_order_fixed,
};
use crate::lgraph::{LayeredGraph, NodeId};
use crate::options::CountingOptions;
use crate::positions::PortPositions;
use crate::tree::AccumulatorTree;

/// Exact between-layer crossing count via an accumulator tree over target indices.
///
/// Edge ends in the right layer are indexed once, then the left layer's edges are streamed in
/// physical order; every earlier edge that ends further down crosses the current one. Edges
/// leaving the same fixed-order port (or the same free-order node) are streamed sorted, so they
/// never count as crossing each other.
#[derive(Debug, Clone)]
pub struct ExactBilayerCounter {
    positions: PortPositions,
    options: CountingOptions,
    sequence: Vec<usize>,
    tree: AccumulatorTree,
}

impl ExactBilayerCounter {
    pub fn new(positions: PortPositions, options: CountingOptions) -> Self {
        Self {
            positions,
            options,
            sequence: Vec::new(),
            tree: AccumulatorTree::default(),
        }
    }

    pub fn count_crossings(
        &mut self,
        graph: &LayeredGraph,
        left: &[NodeId],
        right: &[NodeId],
    ) -> usize {
        let (Some(left_layer), Some(right_layer)) = (layer_of(graph, left), layer_of(graph, right))
        else {
            return 0;
        };

        let target_count =
            assign_target_indices(graph, right, left_layer, &self.positions, &self.options);
        if target_count == 0 {
            return 0;
        }

        self.sequence.clear();
        for &id in left {
            let node = graph.node(id);
            let fixed = port_order_fixed(node, &self.options);
            let mut start = self.sequence.len();
            for port in node.ports() {
                if fixed {
                    start = self.sequence.len();
                }
                for &edge in &graph.port(port).edges {
                    if !leads_to_layer(graph, edge, port, right_layer) {
                        continue;
                    }
                    let target = self.positions.get(graph.other_end(edge, port));
                    let at = start + self.sequence[start..].partition_point(|&t| t <= target);
                    self.sequence.insert(at, target);
                }
            }
        }

        self.tree.reset(target_count);
        let mut crossings = 0;
        for &target in &self.sequence {
            crossings += self.tree.insert(target);
        }
        crossings
    }
}

impl LayerGapCounter for ExactBilayerCounter {
    fn count_between(&mut self, graph: &LayeredGraph, left: &[NodeId], right: &[NodeId]) -> usize {
        self.count_crossings(graph, left, right)
    }
}
