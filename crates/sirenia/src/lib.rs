#![forbid(unsafe_code)]

//! Edge-crossing counting for layered graph layouts with ports.
//!
//! `sirenia` answers one question, many times per layout: how many edge crossings does the
//! current node and port order produce? The counters share a [`PortPositions`] array and are
//! meant to be created once per layout run, then queried by a crossing-minimization sweep that
//! tries candidate swaps and reports committed ones back through the `switch_*` notifiers.
//!
//! - [`counting::BilayerCrossingCounter`]: folded inversion counts between two layers, inside
//!   a layer, and "what if these two were swapped" queries.
//! - [`counting::ExactBilayerCounter`]: one-shot accumulator-tree count between two layers.
//! - [`counting::HyperedgeCrossingApproximator`]: estimate for edges bundled at shared ports.
//! - [`counting::PerpendicularEdgeCounter`]: north/south stub edges within a layer.
//! - [`counting::GraphCrossingAggregator`]: totals over a whole graph.

pub mod counting;
pub mod error;
pub mod options;
pub mod positions;
pub mod traversal;
pub mod tree;

pub use sirenia_lgraph as lgraph;

pub use counting::{
    BilayerCrossingCounter, ExactBilayerCounter, GraphCrossingAggregator,
    HyperedgeCrossingApproximator, LayerGapCounter, PerpendicularEdgeCounter,
};
pub use error::{Error, Result};
pub use options::{BetweenLayerCounting, CountingOptions};
pub use positions::PortPositions;
pub use traversal::{GraphSummary, hyperedge_gaps};
pub use tree::{AccumulatorTree, OrderStatisticsTree};
