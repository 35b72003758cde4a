use super::{
    BilayerCrossingCounter, ExactBilayerCounter, HyperedgeCrossingApproximator, LayerGapCounter,
    PerpendicularEdgeCounter,
};
use crate::error::{Error, Result};
use crate::lgraph::{LayeredGraph, NodeId, NodeKind, PortSide};
use crate::options::{BetweenLayerCounting, CountingOptions};
use crate::positions::PortPositions;
use crate::traversal::check_order;
use tracing::{debug, trace};

/// Crossing totals over a whole node order.
///
/// Owns one instance of every counter, all sharing the same [`PortPositions`]. Create one per
/// layout run and reuse it for every count of that run.
#[derive(Debug, Clone)]
pub struct GraphCrossingAggregator {
    options: CountingOptions,
    positions: PortPositions,
    bilayer: BilayerCrossingCounter,
    exact: ExactBilayerCounter,
    hyperedge: HyperedgeCrossingApproximator,
    perpendicular: PerpendicularEdgeCounter,
}

impl GraphCrossingAggregator {
    pub fn new(graph: &LayeredGraph, options: CountingOptions) -> Self {
        Self::with_positions(PortPositions::for_graph(graph), options)
    }

    /// Uses a position array the caller shares with its own counters.
    pub fn with_positions(positions: PortPositions, options: CountingOptions) -> Self {
        Self {
            options,
            bilayer: BilayerCrossingCounter::new(positions.clone()),
            exact: ExactBilayerCounter::new(positions.clone(), options),
            hyperedge: HyperedgeCrossingApproximator::new(positions.clone(), options),
            perpendicular: PerpendicularEdgeCounter::new(positions.clone(), &options),
            positions,
        }
    }

    pub fn options(&self) -> &CountingOptions {
        &self.options
    }

    pub fn positions(&self) -> &PortPositions {
        &self.positions
    }

    /// The folded counter, for "both orders" queries of a sweep.
    pub fn bilayer_mut(&mut self) -> &mut BilayerCrossingCounter {
        &mut self.bilayer
    }

    pub fn hyperedge(&self) -> &HyperedgeCrossingApproximator {
        &self.hyperedge
    }

    /// Total crossings of `order`: in-layer edges on the outer sides of the first and last
    /// layer, every layer gap, and north/south stubs of every layer.
    ///
    /// `hyperedge_gaps[i]` selects the hyperedge estimate for the gap between layers `i` and
    /// `i + 1` (see [`crate::hyperedge_gaps`]).
    pub fn count_all_crossings(
        &mut self,
        graph: &LayeredGraph,
        order: &[Vec<NodeId>],
        hyperedge_gaps: &[bool],
    ) -> Result<usize> {
        check_order(graph, order)?;
        let expected = order.len().saturating_sub(1);
        if hyperedge_gaps.len() != expected {
            return Err(Error::GapFlagCount {
                expected,
                found: hyperedge_gaps.len(),
            });
        }
        let (Some(first), Some(last)) = (order.first(), order.last()) else {
            return Ok(0);
        };

        let mut crossings = self
            .bilayer
            .count_in_layer_crossings_on_side(graph, first, PortSide::West);
        crossings += self
            .bilayer
            .count_in_layer_crossings_on_side(graph, last, PortSide::East);

        for (index, layer) in order.iter().enumerate() {
            if let Some(right) = order.get(index + 1) {
                let gap = self.count_gap(graph, layer, right, hyperedge_gaps[index]);
                trace!(gap = index, crossings = gap, "layer gap");
                crossings += gap;
            }
            crossings += self.count_north_south(graph, index, layer);
        }

        debug!(layers = order.len(), crossings, "counted all crossings");
        Ok(crossings)
    }

    /// Crossings at the layer a sweep starts from: the outer in-layer side of the first layer
    /// (`forward`) or of the last layer, plus that layer's north/south stubs.
    pub fn count_crossings_in_first_layer(
        &mut self,
        graph: &LayeredGraph,
        order: &[Vec<NodeId>],
        forward: bool,
    ) -> Result<usize> {
        check_order(graph, order)?;
        let (index, side) = if forward {
            (0, PortSide::West)
        } else {
            (order.len().saturating_sub(1), PortSide::East)
        };
        let Some(layer) = order.get(index) else {
            return Ok(0);
        };

        let crossings = self
            .bilayer
            .count_in_layer_crossings_on_side(graph, layer, side)
            + self.count_north_south(graph, index, layer);
        debug!(forward, crossings, "counted first-layer crossings");
        Ok(crossings)
    }

    /// Crossings between `free_layer` and the layer it is swept against (the previous one when
    /// `forward`, the next one otherwise), plus north/south stubs of `free_layer`. Without such a
    /// neighbor, the outer in-layer side of `free_layer` is counted instead.
    pub fn count_crossings_on_neighboring_layers(
        &mut self,
        graph: &LayeredGraph,
        order: &[Vec<NodeId>],
        forward: bool,
        free_layer: usize,
        use_hyperedges: bool,
    ) -> Result<usize> {
        check_order(graph, order)?;
        let Some(free) = order.get(free_layer) else {
            return Err(Error::LayerOutOfRange {
                layer: free_layer,
                count: order.len(),
            });
        };

        let fixed_layer = if forward {
            free_layer.checked_sub(1)
        } else {
            Some(free_layer + 1).filter(|&i| i < order.len())
        };

        let mut crossings = match fixed_layer {
            Some(fixed) if forward => self.count_gap(graph, &order[fixed], free, use_hyperedges),
            Some(fixed) => self.count_gap(graph, free, &order[fixed], use_hyperedges),
            None => {
                let side = if forward {
                    PortSide::West
                } else {
                    PortSide::East
                };
                self.bilayer
                    .count_in_layer_crossings_on_side(graph, free, side)
            }
        };
        crossings += self.count_north_south(graph, free_layer, free);

        debug!(
            free_layer,
            forward, use_hyperedges, crossings, "counted crossings on neighboring layers"
        );
        Ok(crossings)
    }

    fn count_gap(
        &mut self,
        graph: &LayeredGraph,
        left: &[NodeId],
        right: &[NodeId],
        use_hyperedges: bool,
    ) -> usize {
        let counter: &mut dyn LayerGapCounter = match (use_hyperedges, self.options.between_layers)
        {
            (true, _) => &mut self.hyperedge,
            (false, BetweenLayerCounting::Folded) => &mut self.bilayer,
            (false, BetweenLayerCounting::Accumulator) => &mut self.exact,
        };
        trace!(
            use_hyperedges,
            strategy = ?self.options.between_layers,
            "counting layer gap"
        );

        let mut crossings = counter.count_between(graph, left, right);
        if !counter.counts_in_layer_edges() {
            crossings += self
                .bilayer
                .count_in_layer_crossings_on_side(graph, left, PortSide::East);
            crossings += self
                .bilayer
                .count_in_layer_crossings_on_side(graph, right, PortSide::West);
        }
        crossings
    }

    fn count_north_south(&mut self, graph: &LayeredGraph, index: usize, layer: &[NodeId]) -> usize {
        if !layer
            .iter()
            .any(|&n| graph.node(n).kind == NodeKind::NorthSouthDummy)
        {
            return 0;
        }
        let crossings = self.perpendicular.count_crossings(graph, layer);
        trace!(layer = index, crossings, "north/south crossings");
        crossings
    }
}
