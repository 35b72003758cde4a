//! Crossing counters.

mod aggregate;
mod bilayer;
mod exact;
mod hyperedge;
mod indexing;
mod perpendicular;

pub use aggregate::GraphCrossingAggregator;
pub use bilayer::BilayerCrossingCounter;
pub use exact::ExactBilayerCounter;
pub use hyperedge::{HyperedgeCrossingApproximator, HyperedgeEstimate};
pub use perpendicular::{Chord, PerpendicularEdgeCounter, north_south_chords};

use crate::lgraph::{LayeredGraph, NodeId};

/// A strategy for counting the crossings in the gap between two adjacent layers.
pub trait LayerGapCounter {
    fn count_between(&mut self, graph: &LayeredGraph, left: &[NodeId], right: &[NodeId]) -> usize;

    /// Whether [`Self::count_between`] already includes in-layer edges on the facing sides.
    fn counts_in_layer_edges(&self) -> bool {
        false
    }
}
