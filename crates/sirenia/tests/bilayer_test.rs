use sirenia::lgraph::{LayeredGraph, NodeId, PortId, PortSide};
use sirenia::{BilayerCrossingCounter, PortPositions};

fn two_layers(left: usize, right: usize) -> (LayeredGraph, Vec<NodeId>, Vec<NodeId>) {
    let mut g = LayeredGraph::new();
    let l0 = g.add_layer();
    let l1 = g.add_layer();
    let left = (0..left).map(|_| g.add_node(l0).unwrap()).collect();
    let right = (0..right).map(|_| g.add_node(l1).unwrap()).collect();
    (g, left, right)
}

/// Adds an edge from a new east port of `left` to a new west port of `right`.
fn east_west_edge(g: &mut LayeredGraph, left: NodeId, right: NodeId) -> (PortId, PortId) {
    let source = g.add_port(left, PortSide::East).unwrap();
    let target = g.add_port(right, PortSide::West).unwrap();
    g.add_edge(source, target).unwrap();
    (source, target)
}

fn in_layer_edge(g: &mut LayeredGraph, a: NodeId, b: NodeId, side: PortSide) {
    let pa = g.add_port(a, side).unwrap();
    let pb = g.add_port(b, side).unwrap();
    g.add_edge(pa, pb).unwrap();
}

fn counter(g: &LayeredGraph) -> BilayerCrossingCounter {
    BilayerCrossingCounter::new(PortPositions::for_graph(g))
}

fn count(g: &LayeredGraph) -> usize {
    let mut c = counter(g);
    c.count_between_layers(g, g.layer(0), g.layer(1))
}

#[test]
fn cross_formed() {
    let (mut g, l, r) = two_layers(2, 2);
    east_west_edge(&mut g, l[0], r[1]);
    east_west_edge(&mut g, l[1], r[0]);
    assert_eq!(count(&g), 1);
}

#[test]
fn parallel_edges_do_not_cross() {
    let (mut g, l, r) = two_layers(2, 2);
    east_west_edge(&mut g, l[0], r[0]);
    east_west_edge(&mut g, l[1], r[1]);
    assert_eq!(count(&g), 0);
}

#[test]
fn fully_reversed_triple() {
    let (mut g, l, r) = two_layers(3, 3);
    east_west_edge(&mut g, l[0], r[2]);
    east_west_edge(&mut g, l[1], r[1]);
    east_west_edge(&mut g, l[2], r[0]);
    assert_eq!(count(&g), 3);
}

#[test]
fn empty_layers_have_no_crossings() {
    let (g, l, _) = two_layers(2, 0);
    let mut c = counter(&g);
    assert_eq!(c.count_between_layers(&g, &l, &[]), 0);
    assert_eq!(c.count_between_layers(&g, &[], &[]), 0);
}

#[test]
fn self_loops_are_ignored() {
    let (mut g, l, r) = two_layers(2, 2);
    east_west_edge(&mut g, l[0], r[1]);
    east_west_edge(&mut g, l[1], r[0]);
    for &n in &[l[0], r[1]] {
        let a = g.add_port(n, PortSide::East).unwrap();
        let b = g.add_port(n, PortSide::West).unwrap();
        g.add_edge(a, b).unwrap();
    }
    assert_eq!(count(&g), 1);
}

#[test]
fn ports_on_two_nodes_cross_when_ports_are_added_in_order() {
    // West ports are listed bottom-up, so the second west port sits above the first.
    let (mut g, l, r) = two_layers(1, 1);
    east_west_edge(&mut g, l[0], r[0]);
    east_west_edge(&mut g, l[0], r[0]);
    assert_eq!(count(&g), 1);
}

#[test]
fn two_edges_into_the_same_port() {
    let (mut g, l, r) = two_layers(2, 2);
    east_west_edge(&mut g, l[0], r[1]);
    let bottom_left = g.add_port(l[1], PortSide::East).unwrap();
    let top_right = g.add_port(r[0], PortSide::West).unwrap();
    g.add_edge(bottom_left, top_right).unwrap();
    g.add_edge(bottom_left, top_right).unwrap();
    assert_eq!(count(&g), 2);
}

#[test]
fn long_in_layer_crossings() {
    let (mut g, l, _) = two_layers(5, 0);
    in_layer_edge(&mut g, l[0], l[1], PortSide::East);
    in_layer_edge(&mut g, l[1], l[3], PortSide::East);
    in_layer_edge(&mut g, l[2], l[4], PortSide::East);

    let mut c = counter(&g);
    assert_eq!(c.count_in_layer_crossings_on_side(&g, &l, PortSide::East), 1);
    assert_eq!(c.count_in_layer_crossings_on_side(&g, &l, PortSide::West), 0);
    assert_eq!(c.count_in_layer_crossings_on_both_sides(&g, &l), 1);
}

#[test]
fn in_layer_edge_crosses_between_layer_edge() {
    let (mut g, l, r) = two_layers(3, 1);
    in_layer_edge(&mut g, l[0], l[2], PortSide::East);
    east_west_edge(&mut g, l[1], r[0]);

    let mut c = counter(&g);
    assert_eq!(c.count_in_layer_crossings_on_side(&g, &l, PortSide::East), 1);
    // Between two layers the in-layer edge is swept together with the others.
    assert_eq!(c.count_between_layers(&g, &l, &r), 1);
}

#[test]
fn west_side_in_layer_edges_are_numbered_top_down() {
    let (mut g, l, _) = two_layers(4, 0);
    in_layer_edge(&mut g, l[0], l[2], PortSide::West);
    in_layer_edge(&mut g, l[1], l[3], PortSide::West);

    let mut c = counter(&g);
    assert_eq!(c.count_in_layer_crossings_on_side(&g, &l, PortSide::West), 1);
}

#[test]
fn counting_is_idempotent() {
    let (mut g, l, r) = two_layers(3, 3);
    east_west_edge(&mut g, l[0], r[2]);
    east_west_edge(&mut g, l[1], r[1]);
    east_west_edge(&mut g, l[2], r[0]);
    in_layer_edge(&mut g, l[0], l[2], PortSide::East);

    let mut c = counter(&g);
    let first = c.count_between_layers(&g, &l, &r);
    assert_eq!(c.count_between_layers(&g, &l, &r), first);
}

#[test]
fn given_crossings_on_the_eastern_side() {
    let (mut g, l, r) = two_layers(1, 2);
    let (upper, _) = east_west_edge(&mut g, l[0], r[1]);
    let (lower, _) = east_west_edge(&mut g, l[0], r[0]);

    let mut c = counter(&g);
    c.init_for_counting_between(&g, &l, &r);
    assert_eq!(
        c.count_crossings_between_ports_in_both_orders(&g, upper, lower),
        (1, 0)
    );
    // Positions are restored afterwards.
    assert_eq!(
        c.count_crossings_between_ports_in_both_orders(&g, upper, lower),
        (1, 0)
    );
}

#[test]
fn given_crossings_on_the_western_side() {
    let (mut g, l, r) = two_layers(2, 2);
    east_west_edge(&mut g, l[0], r[1]);
    east_west_edge(&mut g, l[1], r[1]);
    east_west_edge(&mut g, l[1], r[0]);

    let west = g.node(r[1]).ports_on(PortSide::West).to_vec();
    let mut c = counter(&g);
    c.init_for_counting_between(&g, &l, &r);
    let (current, swapped) = c.count_crossings_between_ports_in_both_orders(&g, west[1], west[0]);
    assert_eq!(current, 1);
    assert_eq!(swapped, 0);
}

#[test]
fn both_orders_with_two_edges_into_the_same_port() {
    let (mut g, l, r) = two_layers(2, 2);
    let (top_left, _) = east_west_edge(&mut g, l[0], r[1]);
    let bottom_left = g.add_port(l[1], PortSide::East).unwrap();
    let top_right = g.add_port(r[0], PortSide::West).unwrap();
    g.add_edge(bottom_left, top_right).unwrap();
    g.add_edge(bottom_left, top_right).unwrap();

    let mut c = counter(&g);
    c.init_for_counting_between(&g, &l, &r);
    let (current, _) = c.count_crossings_between_ports_in_both_orders(&g, bottom_left, top_left);
    assert_eq!(current, 2);
}

#[test]
fn switching_ports_then_counting_the_new_order() {
    let (mut g, l, r) = two_layers(3, 3);
    let upper = g.add_port(l[1], PortSide::East).unwrap();
    let lower = g.add_port(l[1], PortSide::East).unwrap();
    east_west_edge(&mut g, l[2], r[1]);
    let r1 = g.add_port(r[1], PortSide::West).unwrap();
    g.add_edge(upper, r1).unwrap();
    let r0 = g.add_port(r[0], PortSide::West).unwrap();
    g.add_edge(lower, r0).unwrap();
    east_west_edge(&mut g, l[0], r[0]);

    let mut c = counter(&g);
    assert_eq!(c.count_between_layers(&g, &l, &r), 1);

    c.init_for_counting_between(&g, &l, &r);
    assert_eq!(c.count_crossings_between_ports_in_both_orders(&g, upper, lower).0, 1);

    g.swap_ports(upper, lower).unwrap();
    c.switch_ports(upper, lower);
    let east = g.node(l[1]).ports_on(PortSide::East).to_vec();
    assert_eq!(c.count_crossings_between_ports_in_both_orders(&g, east[0], east[1]).0, 0);
    assert_eq!(c.count_between_layers(&g, &l, &r), 0);
}

#[test]
fn in_layer_crossings_between_nodes_in_both_orders() {
    let (mut g, l, r) = two_layers(3, 1);
    in_layer_edge(&mut g, l[0], l[2], PortSide::East);
    east_west_edge(&mut g, l[1], r[0]);

    let mut c = counter(&g);
    c.init_port_positions_for_in_layer_crossings(&g, &l, PortSide::East);
    assert_eq!(
        c.count_in_layer_crossings_between_nodes_in_both_orders(&g, l[0], l[1], PortSide::East),
        (1, 0)
    );

    c.switch_nodes(&g, l[0], l[1], PortSide::East);
    assert_eq!(
        c.count_in_layer_crossings_between_nodes_in_both_orders(&g, l[1], l[0], PortSide::East),
        (0, 1)
    );
}

#[test]
#[should_panic(expected = "requires init_for_counting_between")]
fn port_query_without_initialization_panics() {
    let (mut g, l, r) = two_layers(1, 1);
    let (a, _) = east_west_edge(&mut g, l[0], r[0]);
    let (b, _) = east_west_edge(&mut g, l[0], r[0]);
    let mut c = counter(&g);
    c.count_crossings_between_ports_in_both_orders(&g, a, b);
}

#[test]
#[should_panic(expected = "requires init_port_positions_for_in_layer_crossings")]
fn node_query_on_the_wrong_side_panics() {
    let (mut g, l, _) = two_layers(2, 0);
    in_layer_edge(&mut g, l[0], l[1], PortSide::East);
    let mut c = counter(&g);
    c.init_port_positions_for_in_layer_crossings(&g, &l, PortSide::West);
    c.count_in_layer_crossings_between_nodes_in_both_orders(&g, l[0], l[1], PortSide::East);
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

fn random_bilayer(rng: &mut Lcg) -> (LayeredGraph, Vec<NodeId>, Vec<NodeId>) {
    let (mut g, l, r) = two_layers(4, 4);
    let sources: Vec<PortId> = l
        .iter()
        .flat_map(|&n| vec![n; 1 + rng.next(3)])
        .map(|n| g.add_port(n, PortSide::East).unwrap())
        .collect();
    let targets: Vec<PortId> = r
        .iter()
        .flat_map(|&n| vec![n; 1 + rng.next(3)])
        .map(|n| g.add_port(n, PortSide::West).unwrap())
        .collect();
    for _ in 0..12 {
        let s = sources[rng.next(sources.len())];
        let t = targets[rng.next(targets.len())];
        g.add_edge(s, t).unwrap();
    }
    (g, l, r)
}

#[test]
fn both_orders_difference_matches_a_full_recount() {
    let mut rng = Lcg(3);
    for _ in 0..25 {
        let (mut g, l, r) = random_bilayer(&mut rng);
        let mut c = counter(&g);

        for (nodes, side) in [(&l, PortSide::East), (&r, PortSide::West)] {
            for &node in nodes.iter() {
                for i in 1..g.node(node).ports_on(side).len() {
                    let before = c.count_between_layers(&g, &l, &r);
                    let ports = g.node(node).ports_on(side).to_vec();
                    c.init_for_counting_between(&g, &l, &r);
                    let (current, swapped) =
                        c.count_crossings_between_ports_in_both_orders(&g, ports[i - 1], ports[i]);

                    g.swap_ports(ports[i - 1], ports[i]).unwrap();
                    let after = c.count_between_layers(&g, &l, &r);
                    assert_eq!(
                        before as isize - after as isize,
                        current as isize - swapped as isize
                    );
                }
            }
        }
    }
}

#[test]
fn node_swap_difference_matches_a_full_recount() {
    let mut rng = Lcg(11);
    for _ in 0..20 {
        let (mut g, mut l, r) = two_layers(5, 2);
        for _ in 0..rng.next(6) {
            let a = rng.next(l.len());
            let b = rng.next(l.len());
            if a != b {
                let side = if rng.next(2) == 0 {
                    PortSide::East
                } else {
                    PortSide::West
                };
                in_layer_edge(&mut g, l[a], l[b], side);
            }
        }
        for _ in 0..rng.next(5) {
            let s = l[rng.next(l.len())];
            let t = r[rng.next(r.len())];
            east_west_edge(&mut g, s, t);
        }
        let mut c = counter(&g);

        for side in [PortSide::East, PortSide::West] {
            for i in 1..l.len() {
                let before = c.count_in_layer_crossings_on_side(&g, &l, side);
                c.init_port_positions_for_in_layer_crossings(&g, &l, side);
                let (current, swapped) =
                    c.count_in_layer_crossings_between_nodes_in_both_orders(&g, l[i - 1], l[i], side);

                l.swap(i - 1, i);
                let after = c.count_in_layer_crossings_on_side(&g, &l, side);
                assert_eq!(
                    before as isize - after as isize,
                    current as isize - swapped as isize
                );
            }
        }
    }
}
