use sirenia::lgraph::{LayeredGraph, NodeId, PortId, PortSide};
use sirenia::{BilayerCrossingCounter, CountingOptions, ExactBilayerCounter, PortPositions};

fn two_layers(left: usize, right: usize) -> (LayeredGraph, Vec<NodeId>, Vec<NodeId>) {
    let mut g = LayeredGraph::new();
    let l0 = g.add_layer();
    let l1 = g.add_layer();
    let left = (0..left).map(|_| g.add_node(l0).unwrap()).collect();
    let right = (0..right).map(|_| g.add_node(l1).unwrap()).collect();
    (g, left, right)
}

fn east_west_edge(g: &mut LayeredGraph, left: NodeId, right: NodeId) -> (PortId, PortId) {
    let source = g.add_port(left, PortSide::East).unwrap();
    let target = g.add_port(right, PortSide::West).unwrap();
    g.add_edge(source, target).unwrap();
    (source, target)
}

fn exact(g: &LayeredGraph, options: CountingOptions) -> usize {
    let mut c = ExactBilayerCounter::new(PortPositions::for_graph(g), options);
    c.count_crossings(g, g.layer(0), g.layer(1))
}

fn fixed() -> CountingOptions {
    CountingOptions {
        assume_fixed_port_order: true,
        ..CountingOptions::default()
    }
}

#[test]
fn simple_scenarios() {
    let (mut g, l, r) = two_layers(2, 2);
    east_west_edge(&mut g, l[0], r[1]);
    east_west_edge(&mut g, l[1], r[0]);
    assert_eq!(exact(&g, CountingOptions::default()), 1);

    let (mut g, l, r) = two_layers(2, 2);
    east_west_edge(&mut g, l[0], r[0]);
    east_west_edge(&mut g, l[1], r[1]);
    assert_eq!(exact(&g, CountingOptions::default()), 0);

    let (mut g, l, r) = two_layers(3, 3);
    east_west_edge(&mut g, l[0], r[2]);
    east_west_edge(&mut g, l[1], r[1]);
    east_west_edge(&mut g, l[2], r[0]);
    assert_eq!(exact(&g, CountingOptions::default()), 3);
}

#[test]
fn empty_or_unconnected_layers_count_zero() {
    let (g, l, _) = two_layers(2, 0);
    let mut c = ExactBilayerCounter::new(PortPositions::for_graph(&g), CountingOptions::default());
    assert_eq!(c.count_crossings(&g, &l, &[]), 0);

    let (g, l, r) = two_layers(2, 2);
    let mut c = ExactBilayerCounter::new(PortPositions::for_graph(&g), CountingOptions::default());
    assert_eq!(c.count_crossings(&g, &l, &r), 0);
}

#[test]
fn one_port_fanning_out_does_not_cross_itself() {
    let (mut g, l, r) = two_layers(1, 2);
    let source = g.add_port(l[0], PortSide::East).unwrap();
    let upper = g.add_port(r[0], PortSide::West).unwrap();
    let lower = g.add_port(r[1], PortSide::West).unwrap();
    g.add_edge(source, lower).unwrap();
    g.add_edge(source, upper).unwrap();
    assert_eq!(exact(&g, CountingOptions::default()), 0);
    assert_eq!(exact(&g, fixed()), 0);
}

#[test]
fn fixed_port_order_keeps_ports_apart() {
    let (mut g, l, r) = two_layers(1, 2);
    east_west_edge(&mut g, l[0], r[1]);
    east_west_edge(&mut g, l[0], r[0]);

    assert_eq!(exact(&g, CountingOptions::default()), 0);
    assert_eq!(exact(&g, fixed()), 1);

    g.set_port_order_fixed(l[0], true).unwrap();
    assert_eq!(exact(&g, CountingOptions::default()), 1);
}

#[test]
fn in_layer_edges_and_self_loops_are_skipped() {
    let (mut g, l, r) = two_layers(2, 2);
    east_west_edge(&mut g, l[0], r[1]);
    east_west_edge(&mut g, l[1], r[0]);
    let a = g.add_port(l[0], PortSide::East).unwrap();
    let b = g.add_port(l[1], PortSide::East).unwrap();
    g.add_edge(a, b).unwrap();
    let c = g.add_port(r[0], PortSide::West).unwrap();
    g.add_edge(c, c).unwrap();
    assert_eq!(exact(&g, CountingOptions::default()), 1);
}

#[test]
fn edges_pointing_backwards_count_the_same() {
    let (mut g, l, r) = two_layers(2, 2);
    let s0 = g.add_port(l[0], PortSide::East).unwrap();
    let t1 = g.add_port(r[1], PortSide::West).unwrap();
    g.add_edge(t1, s0).unwrap();
    let s1 = g.add_port(l[1], PortSide::East).unwrap();
    let t0 = g.add_port(r[0], PortSide::West).unwrap();
    g.add_edge(t0, s1).unwrap();
    assert_eq!(exact(&g, CountingOptions::default()), 1);
}

struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound
    }
}

#[test]
fn matches_the_folded_count_when_every_port_order_is_fixed() {
    let mut rng = Lcg(19);
    for _ in 0..40 {
        let (mut g, l, r) = two_layers(1 + rng.next(5), 1 + rng.next(5));
        for _ in 0..rng.next(14) {
            let s = l[rng.next(l.len())];
            let t = r[rng.next(r.len())];
            east_west_edge(&mut g, s, t);
        }

        let positions = PortPositions::for_graph(&g);
        let mut folded = BilayerCrossingCounter::new(positions.clone());
        let mut accumulator = ExactBilayerCounter::new(positions, fixed());
        assert_eq!(
            accumulator.count_crossings(&g, &l, &r),
            folded.count_between_layers(&g, &l, &r)
        );
    }
}

/// One fixed-order node on the right with two north ports, a west port and a south port, fed by
/// one left node each. `wiring[i]` names the port, in top-to-bottom entry order, fed by left
/// node `i`.
fn fixed_node_entries(wiring: [usize; 4]) -> LayeredGraph {
    let (mut g, l, r) = two_layers(4, 1);
    g.set_port_order_fixed(r[0], true).unwrap();
    let north_west = g.add_port(r[0], PortSide::North).unwrap();
    let north_east = g.add_port(r[0], PortSide::North).unwrap();
    let west = g.add_port(r[0], PortSide::West).unwrap();
    let south = g.add_port(r[0], PortSide::South).unwrap();
    let entries = [north_east, north_west, west, south];
    for (i, &target) in wiring.iter().enumerate() {
        let source = g.add_port(l[i], PortSide::East).unwrap();
        g.add_edge(source, entries[target]).unwrap();
    }
    g
}

#[test]
fn fixed_order_targets_enter_north_then_west_then_south() {
    let g = fixed_node_entries([0, 1, 2, 3]);
    assert_eq!(exact(&g, CountingOptions::default()), 0);

    let g = fixed_node_entries([1, 0, 2, 3]);
    assert_eq!(exact(&g, CountingOptions::default()), 1);

    let g = fixed_node_entries([0, 1, 3, 2]);
    assert_eq!(exact(&g, CountingOptions::default()), 1);
}
