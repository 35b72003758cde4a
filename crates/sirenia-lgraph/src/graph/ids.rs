//! Dense arena ids.
//!
//! Every id is the index of its element in the owning [`LayeredGraph`](super::LayeredGraph), so
//! per-element scratch state can live in plain vectors indexed by `id.index()`.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            #[inline]
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

dense_id!(
    /// Index of a node in [`LayeredGraph::nodes`](super::LayeredGraph::nodes).
    NodeId,
    "n"
);
dense_id!(
    /// Index of a port; also the slot of the port in a position array.
    PortId,
    "p"
);
dense_id!(EdgeId, "e");
