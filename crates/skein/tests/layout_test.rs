use skein::{LayoutOptions, Vec2, solve, solve_positions};
use skein_graph::Graph;

#[test]
fn empty_graph_is_a_no_op() {
    let g = Graph::new();
    let result = solve(&g, &LayoutOptions::default());
    assert!(result.placements.is_empty());
}

#[test]
fn singleton_graph_lands_pinned_at_its_cell_center() {
    let mut g = Graph::new();
    g.ensure_node("only");
    solve_positions(&mut g, &LayoutOptions::default());

    // Footprint 2 at the grid origin, component-local (0, 0) maps to the cell center.
    assert_eq!(g.position("only"), Some((120.0, 120.0)));
    assert!(g.pinned("only"));
    assert_eq!(g.attr("only", "pinned"), Some("1"));
}

#[test]
fn pair_graph_gets_the_fixed_horizontal_split() {
    let mut g = Graph::new();
    g.add_edge("a", "b", None);
    solve_positions(&mut g, &LayoutOptions::default());

    let (ax, ay) = g.position("a").unwrap();
    let (bx, by) = g.position("b").unwrap();

    // Local (-0.75, 0) / (0.75, 0) through a footprint-4 cell at 120 units per cell.
    assert!((ax - 78.0).abs() < 1e-9, "ax = {ax}");
    assert!((bx - 402.0).abs() < 1e-9, "bx = {bx}");
    assert!((ay - 240.0).abs() < 1e-9 && (by - 240.0).abs() < 1e-9);
    assert!(!g.pinned("a") && !g.pinned("b"));
}

#[test]
fn every_node_of_a_mixed_graph_is_placed_exactly_once() {
    let mut g = Graph::new();
    // Triangle, pair, and a lone node: three components.
    g.add_edge("t1", "t2", None);
    g.add_edge("t2", "t3", None);
    g.add_edge("t3", "t1", None);
    g.add_edge("p1", "p2", None);
    g.ensure_node("solo");

    let result = solve(&g, &LayoutOptions::default());
    assert_eq!(result.placements.len(), g.node_count());
    for id in g.node_ids() {
        let placement = result.placements.get(id).expect("placed");
        assert!(placement.pos.x.is_finite() && placement.pos.y.is_finite());
    }
}

#[test]
fn solving_twice_reproduces_the_layout() {
    let mut g = Graph::new();
    for (a, b) in [("a", "b"), ("b", "c"), ("c", "d"), ("d", "a"), ("a", "c")] {
        g.add_edge(a, b, None);
    }
    g.add_edge("x", "y", None);
    g.ensure_node("z");

    let opts = LayoutOptions::default();
    let first = solve(&g, &opts);
    let second = solve(&g, &opts);

    assert_eq!(first.placements.len(), second.placements.len());
    for (id, placement) in &first.placements {
        assert_eq!(second.placements.get(id), Some(placement));
    }
}

#[test]
fn components_occupy_disjoint_canvas_regions() {
    let mut g = Graph::new();
    for i in 0..6 {
        g.add_edge(format!("a{i}"), format!("a{}", (i + 1) % 6), None);
    }
    for i in 0..4 {
        g.add_edge(format!("b{i}"), format!("b{}", (i + 1) % 4), None);
    }
    g.add_edge("c0", "c1", None);

    let result = solve(&g, &LayoutOptions::default());

    let bbox = |prefix: &str| {
        let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (id, p) in &result.placements {
            if id.starts_with(prefix) {
                min.x = min.x.min(p.pos.x);
                min.y = min.y.min(p.pos.y);
                max.x = max.x.max(p.pos.x);
                max.y = max.y.max(p.pos.y);
            }
        }
        (min, max)
    };

    let groups = ["a", "b", "c"];
    for i in 0..groups.len() {
        for j in i + 1..groups.len() {
            let (min_i, max_i) = bbox(groups[i]);
            let (min_j, max_j) = bbox(groups[j]);
            let separated = max_i.x < min_j.x
                || max_j.x < min_i.x
                || max_i.y < min_j.y
                || max_j.y < min_i.y;
            assert!(
                separated,
                "components {} and {} overlap on the canvas",
                groups[i], groups[j]
            );
        }
    }
}

#[test]
fn write_back_preserves_unrelated_attributes() {
    let mut g = Graph::new();
    g.add_edge("a", "b", None);
    g.set_attr("a", "special", "1");

    solve_positions(&mut g, &LayoutOptions::default());
    assert!(g.is_special("a"));
    assert!(g.position("a").is_some());
}
