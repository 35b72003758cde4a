use serde::{Deserialize, Serialize};

/// Exact strategy for layer gaps that are not counted as hyperedge gaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetweenLayerCounting {
    /// Fold both facing sides into one index sequence and count inversions. Also counts the
    /// in-layer edges of both facing sides.
    #[default]
    Folded,
    /// Accumulator tree over target indices, plus explicit in-layer counts on both facing sides.
    Accumulator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountingOptions {
    /// Treat every node as if its port order were fixed when assigning indices.
    pub assume_fixed_port_order: bool,
    /// Edges are routed orthogonally; a north/south stub then crosses a neighbor once no matter
    /// how many edges it carries.
    pub orthogonal_routing: bool,
    pub between_layers: BetweenLayerCounting,
}

impl Default for CountingOptions {
    fn default() -> Self {
        Self {
            assume_fixed_port_order: false,
            orthogonal_routing: true,
            between_layers: BetweenLayerCounting::default(),
        }
    }
}
