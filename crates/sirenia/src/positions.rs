use crate::lgraph::{LayeredGraph, PortId};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Per-port index positions shared by every counter of one layout run.
///
/// Cloning is cheap and yields a handle to the same array. Each counter rewrites the slots of
/// the ports it is about to count, so values are only meaningful right after the writer's
/// initialization step.
#[derive(Clone)]
pub struct PortPositions {
    slots: Rc<[Cell<usize>]>,
}

impl PortPositions {
    pub fn new(port_count: usize) -> Self {
        Self {
            slots: (0..port_count).map(|_| Cell::new(0)).collect(),
        }
    }

    pub fn for_graph(graph: &LayeredGraph) -> Self {
        Self::new(graph.port_count())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn get(&self, port: PortId) -> usize {
        self.slot(port).get()
    }

    #[inline]
    pub fn set(&self, port: PortId, position: usize) {
        self.slot(port).set(position);
    }

    pub fn swap(&self, a: PortId, b: PortId) {
        self.slot(a).swap(self.slot(b));
    }

    /// Both handles refer to the same array.
    pub fn shares_with(&self, other: &PortPositions) -> bool {
        Rc::ptr_eq(&self.slots, &other.slots)
    }

    #[inline]
    fn slot(&self, port: PortId) -> &Cell<usize> {
        match self.slots.get(port.index()) {
            Some(slot) => slot,
            None => panic!(
                "port {port} outside the {} allocated positions",
                self.slots.len()
            ),
        }
    }
}

impl fmt::Debug for PortPositions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(Cell::get))
            .finish()
    }
}
