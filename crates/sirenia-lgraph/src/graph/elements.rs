//! Node, port and edge records stored by [`LayeredGraph`](super::LayeredGraph).

use super::ids::{EdgeId, NodeId, PortId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortSide {
    North,
    East,
    South,
    West,
}

impl PortSide {
    /// Clockwise, starting at the top.
    pub const ALL: [PortSide; 4] = [
        PortSide::North,
        PortSide::East,
        PortSide::South,
        PortSide::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            PortSide::North => PortSide::South,
            PortSide::East => PortSide::West,
            PortSide::South => PortSide::North,
            PortSide::West => PortSide::East,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Normal,
    /// Placeholder for an edge spanning more than one layer gap.
    LongEdgeDummy,
    /// Stand-in for an edge attached to the top or bottom of a node in the same layer.
    NorthSouthDummy,
}

/// Ports of a node grouped by side.
///
/// Each list is kept in clockwise order: north west-to-east, east top-to-bottom, south
/// east-to-west and west bottom-to-top.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidePorts {
    pub north: Vec<PortId>,
    pub east: Vec<PortId>,
    pub south: Vec<PortId>,
    pub west: Vec<PortId>,
}

impl SidePorts {
    pub fn side(&self, side: PortSide) -> &[PortId] {
        match side {
            PortSide::North => &self.north,
            PortSide::East => &self.east,
            PortSide::South => &self.south,
            PortSide::West => &self.west,
        }
    }

    pub fn side_mut(&mut self, side: PortSide) -> &mut Vec<PortId> {
        match side {
            PortSide::North => &mut self.north,
            PortSide::East => &mut self.east,
            PortSide::South => &mut self.south,
            PortSide::West => &mut self.west,
        }
    }

    pub fn clockwise(&self) -> impl DoubleEndedIterator<Item = PortId> + '_ {
        self.north
            .iter()
            .chain(&self.east)
            .chain(&self.south)
            .chain(&self.west)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.north.len() + self.east.len() + self.south.len() + self.west.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub layer: usize,
    #[serde(default)]
    pub kind: NodeKind,
    /// The layout may not reorder this node's ports.
    #[serde(default)]
    pub port_order_fixed: bool,
    #[serde(default)]
    pub ports: SidePorts,
}

impl Node {
    pub fn ports_on(&self, side: PortSide) -> &[PortId] {
        self.ports.side(side)
    }

    /// All ports, clockwise from the north-west corner.
    pub fn ports(&self) -> impl DoubleEndedIterator<Item = PortId> + '_ {
        self.ports.clockwise()
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: PortId,
    pub node: NodeId,
    pub side: PortSide,
    #[serde(default)]
    pub edges: Vec<EdgeId>,
    /// For ports of dummy nodes: the port of the real node this dummy routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<PortId>,
}

impl Port {
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: PortId,
    pub target: PortId,
}

impl Edge {
    /// The end of this edge that is not `port`. For an edge looping on a single port this is the
    /// port itself.
    pub fn other_end(&self, port: PortId) -> PortId {
        if self.source == port {
            self.target
        } else {
            self.source
        }
    }
}
