//! Cold-start layout orchestration.
//!
//! One synchronous batch per graph load: decompose into connected components, solve
//! each component in isolation, then pack the normalized component layouts onto a
//! shared canvas and write positions back through the graph's attribute boundary.

use crate::component::{self, Component};
use crate::distance::{DistanceMatrix, Metric};
use crate::embed;
use crate::geom::Vec2;
use crate::pack::{GridPacker, footprint};
use crate::rng::XorShift64Star;
use crate::stress::{self, StressMajorizer};
use indexmap::IndexMap;
use skein_graph::Graph;

#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Stress-majorization convergence threshold (sum of per-node displacements).
    pub stress_epsilon: f64,
    /// Components above this size skip embedding and majorization and get uniform
    /// random coordinates instead. Bounds worst-case running time at the cost of
    /// layout quality; a policy, not a failure.
    pub max_exact_nodes: usize,
    /// Canvas units per packing-grid cell.
    pub cell_scale: f64,
    pub metric: Metric,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            stress_epsilon: stress::DEFAULT_EPSILON,
            max_exact_nodes: 300,
            cell_scale: 120.0,
            metric: Metric::Hops,
        }
    }
}

/// Final placement for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Vec2,
    pub pinned: bool,
}

/// Placements keyed by node id, in graph insertion order.
#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    pub placements: IndexMap<String, Placement>,
}

/// Computes positions for every node of a possibly-disconnected graph.
///
/// Empty graphs return an empty result immediately. Set `SKEIN_LAYOUT_TIMING=1` to get
/// a one-line per-stage timing report on stderr.
pub fn solve(g: &Graph, opts: &LayoutOptions) -> LayoutResult {
    let timing_enabled = std::env::var("SKEIN_LAYOUT_TIMING").ok().as_deref() == Some("1");
    let total_start = timing_enabled.then(std::time::Instant::now);

    let mut result = LayoutResult::default();
    if g.is_empty() {
        return result;
    }

    let decompose_start = timing_enabled.then(std::time::Instant::now);
    let components = component::decompose(g);
    let decompose_elapsed = decompose_start.map(|s| s.elapsed());

    let solve_start = timing_enabled.then(std::time::Instant::now);
    let mut solved: Vec<(usize, Vec<Vec2>, bool)> = components
        .iter()
        .enumerate()
        .map(|(idx, comp)| {
            let (positions, pinned) = solve_component(comp, opts);
            (idx, positions, pinned)
        })
        .collect();
    let solve_elapsed = solve_start.map(|s| s.elapsed());

    // Largest first; ties keep discovery order so output stays deterministic.
    solved.sort_by_key(|(idx, positions, _)| (std::cmp::Reverse(positions.len()), *idx));

    let pack_start = timing_enabled.then(std::time::Instant::now);
    let mut packer = GridPacker::new(footprint(solved[0].1.len()));
    for (idx, positions, pinned) in &solved {
        let comp = &components[*idx];
        let side = footprint(positions.len());
        let (cell_x, cell_y) = packer.place(side);
        let w = side as f64;

        for (id, p) in comp.node_ids.iter().zip(positions) {
            let x = (cell_x as f64 + 0.5 * (1.0 + 0.9 * p.x) * w) * opts.cell_scale;
            let y = (cell_y as f64 + 0.5 * (1.0 + 0.9 * p.y) * w) * opts.cell_scale;
            result.placements.insert(
                id.clone(),
                Placement {
                    pos: Vec2::new(x, y),
                    pinned: *pinned,
                },
            );
        }
    }
    let pack_elapsed = pack_start.map(|s| s.elapsed());

    if let Some(s) = total_start {
        eprintln!(
            "[skein-layout-timing] total={:?} decompose={:?} components={:?} pack={:?} nodes={} components_count={}",
            s.elapsed(),
            decompose_elapsed.unwrap_or_default(),
            solve_elapsed.unwrap_or_default(),
            pack_elapsed.unwrap_or_default(),
            g.node_count(),
            components.len(),
        );
    }

    result
}

/// Runs [`solve`] and writes `pos`/`pinned` attributes back onto the graph.
pub fn solve_positions(g: &mut Graph, opts: &LayoutOptions) {
    let result = solve(g, opts);
    for (id, placement) in &result.placements {
        g.set_position(id, placement.pos.x, placement.pos.y);
        g.set_pinned(id, placement.pinned);
    }
}

/// Positions one component in its normalized local frame (roughly [-1, 1]²).
/// Returns the positions plus the component-wide pinned flag.
fn solve_component(comp: &Component, opts: &LayoutOptions) -> (Vec<Vec2>, bool) {
    let n = comp.len();

    if n <= 1 {
        // Trivial placement at the component origin, excluded from simulation.
        return (vec![Vec2::ZERO; n], true);
    }

    if n == 2 {
        return (vec![Vec2::new(-0.75, 0.0), Vec2::new(0.75, 0.0)], false);
    }

    if n > opts.max_exact_nodes {
        let positions = comp
            .node_ids
            .iter()
            .map(|id| {
                let mut rng = XorShift64Star::for_node(id);
                Vec2::new(rng.next_f64_unit() - 0.5, rng.next_f64_unit() - 0.5)
            })
            .collect();
        return (positions, false);
    }

    let d = DistanceMatrix::build(comp, opts.metric);
    let seeded = embed::classical_scaling(&d, &comp.node_ids);
    let mut majorizer = StressMajorizer::new(&d, seeded);
    majorizer.run(opts.stress_epsilon);

    let mut positions = majorizer.into_positions();
    normalize(&mut positions);
    (positions, false)
}

/// Translates the bounding-box center to the origin and scales the larger extent
/// to [-1, 1].
pub(crate) fn normalize(positions: &mut [Vec2]) {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in positions.iter() {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let center = Vec2::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
    let half = ((max_x - min_x).max(max_y - min_y)) / 2.0;
    let scale = if half > 0.0 { 1.0 / half } else { 1.0 };

    for p in positions.iter_mut() {
        *p = (*p - center) * scale;
    }
}
