//! Distance scaling by stress majorization.
//!
//! Minimizes the weighted stress Σ_{i≠j} w_ij (‖p_i − p_j‖ − d_ij)² with
//! w_ij = 1/d_ij². Each sweep is a simultaneous (Jacobi) update computed from the
//! previous sweep's positions, which is what gives majorization its
//! stress-never-increases guarantee.

use crate::distance::DistanceMatrix;
use crate::geom::Vec2;

pub const DEFAULT_EPSILON: f64 = 0.005;

// Below this squared separation the distance ratio is forced to 0 instead of blowing up.
const MIN_SEPARATION_SQ: f64 = 1e-6;

#[derive(Debug, Clone, Copy)]
struct Target {
    to: usize,
    d: f64,
    w: f64,
}

#[derive(Debug, Clone)]
pub struct StressMajorizer {
    targets: Vec<Vec<Target>>,
    p: Vec<Vec2>,
    scratch: Vec<Vec2>,
}

impl StressMajorizer {
    /// Builds per-node target lists from the distance matrix. Zero entries off the
    /// diagonal are skipped; they would make the weight infinite.
    pub fn new(d: &DistanceMatrix, positions: Vec<Vec2>) -> Self {
        let n = d.n();
        assert_eq!(n, positions.len());

        let mut targets: Vec<Vec<Target>> = Vec::with_capacity(n);
        for i in 0..n {
            let mut row = Vec::new();
            for j in 0..n {
                if j == i {
                    continue;
                }
                let dij = d.get(i, j);
                if dij == 0.0 {
                    continue;
                }
                row.push(Target {
                    to: j,
                    d: dij,
                    w: 1.0 / (dij * dij),
                });
            }
            targets.push(row);
        }

        let scratch = positions.clone();
        Self {
            targets,
            p: positions,
            scratch,
        }
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.p
    }

    pub fn into_positions(self) -> Vec<Vec2> {
        self.p
    }

    /// One majorization sweep. Every node's candidate is computed from the previous
    /// sweep's positions for all other nodes, then the buffers swap. Returns the sum of
    /// per-node displacement magnitudes.
    pub fn sweep(&mut self) -> f64 {
        let n = self.p.len();

        for i in 0..n {
            let pi = self.p[i];
            let mut acc = Vec2::ZERO;
            let mut wsum = 0.0;

            for t in &self.targets[i] {
                let pj = self.p[t.to];
                let ratio = distance_ratio(pi, pj, t.d);
                acc += (pj + (pi - pj) * ratio) * t.w;
                wsum += t.w;
            }

            self.scratch[i] = if wsum > 0.0 { acc * (1.0 / wsum) } else { pi };
        }

        let mut moved = 0.0;
        for i in 0..n {
            moved += self.p[i].dist(self.scratch[i]);
        }
        std::mem::swap(&mut self.p, &mut self.scratch);
        moved
    }

    /// Sweeps until the total displacement drops to `epsilon`. There is no iteration
    /// cap; the majorization guarantee means displacement shrinks on non-degenerate
    /// input.
    pub fn run(&mut self, epsilon: f64) -> usize {
        let mut sweeps = 0;
        while self.sweep() > epsilon {
            sweeps += 1;
        }
        sweeps + 1
    }

    /// Current weighted stress, over ordered pairs.
    pub fn stress(&self) -> f64 {
        let mut total = 0.0;
        for (i, row) in self.targets.iter().enumerate() {
            for t in row {
                let realized = self.p[i].dist(self.p[t.to]);
                let err = realized - t.d;
                total += t.w * err * err;
            }
        }
        total
    }
}

fn distance_ratio(pi: Vec2, pj: Vec2, d: f64) -> f64 {
    let sep_sq = (pi - pj).length_sq();
    if sep_sq < MIN_SEPARATION_SQ {
        return 0.0;
    }
    d / sep_sq.sqrt()
}
