//! Initial embedding via classical distance scaling (classical MDS).
//!
//! The squared-distance matrix is double-centered into a Gram matrix whose two
//! dominant eigenpairs give seed coordinates that approximately preserve the graph
//! distances. Degenerate decompositions fall back to per-node pseudo-random seeds, so
//! the embedder never fails and repeated runs reproduce identical output.

use crate::distance::DistanceMatrix;
use crate::geom::Vec2;
use crate::rng::XorShift64Star;
use nalgebra::DMatrix;

/// Breaks exact coincidences left by symmetric inputs; without it the majorizer's
/// distance ratios can divide by zero.
const JITTER: f64 = 0.001;

/// Eigenvalues at or below this are treated as degenerate (collinear or numerically
/// unstable input).
const MIN_EIGENVALUE: f64 = 1e-9;

/// Seeds 2D coordinates for `n >= 3` nodes from their distance matrix.
///
/// The caller special-cases smaller and oversized components; see the layout pipeline.
pub fn classical_scaling(d: &DistanceMatrix, node_ids: &[String]) -> Vec<Vec2> {
    let n = d.n();
    debug_assert_eq!(n, node_ids.len());
    debug_assert!(n >= 3);

    // Per-node streams: two draws seed the fallback, two more jitter. Drawing the seeds
    // unconditionally keeps the streams aligned whichever path is taken.
    let mut rngs: Vec<XorShift64Star> = node_ids
        .iter()
        .map(|id| XorShift64Star::for_node(id))
        .collect();
    let seeds: Vec<Vec2> = rngs
        .iter_mut()
        .map(|rng| Vec2::new(rng.next_f64_unit(), rng.next_f64_unit()))
        .collect();

    let mut positions = eigen_coordinates(d).unwrap_or(seeds);

    for (p, rng) in positions.iter_mut().zip(rngs.iter_mut()) {
        p.x += JITTER * rng.next_f64_unit();
        p.y += JITTER * rng.next_f64_unit();
    }

    positions
}

/// Double-centering plus the top-2 eigenpairs. `None` when the decomposition is
/// degenerate (non-positive or non-finite leading eigenvalues, non-finite vectors).
fn eigen_coordinates(d: &DistanceMatrix) -> Option<Vec<Vec2>> {
    let n = d.n();

    let sq = DMatrix::<f64>::from_fn(n, n, |i, j| {
        let v = d.get(i, j);
        v * v
    });

    let row_means: Vec<f64> = (0..n).map(|i| sq.row(i).sum() / n as f64).collect();
    let total_mean = row_means.iter().sum::<f64>() / n as f64;

    // B = -1/2 * J * D^2 * J, with J the centering matrix.
    let gram = DMatrix::<f64>::from_fn(n, n, |i, j| {
        -0.5 * (sq[(i, j)] - row_means[i] - row_means[j] + total_mean)
    });

    let eigen = gram.symmetric_eigen();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let (first, second) = (order[0], order[1]);

    let l1 = eigen.eigenvalues[first];
    let l2 = eigen.eigenvalues[second];
    if !(l1.is_finite() && l2.is_finite()) || l1 <= MIN_EIGENVALUE || l2 <= MIN_EIGENVALUE {
        return None;
    }

    let (s1, s2) = (l1.sqrt(), l2.sqrt());
    let v1 = eigen.eigenvectors.column(first);
    let v2 = eigen.eigenvectors.column(second);

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let p = Vec2::new(v1[i] * s1, v2[i] * s2);
        if !(p.x.is_finite() && p.y.is_finite()) {
            return None;
        }
        out.push(p);
    }
    Some(out)
}
