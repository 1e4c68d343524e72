//! All-pairs graph-theoretic distances within one connected component.

use crate::component::Component;

/// Edge-length convention for the distance matrix.
///
/// The default is the unweighted hop count. `EdgeLength` maps an edge's optional kind
/// label to a positive length, for hosts that weight link types differently.
#[derive(Debug, Clone, Copy, Default)]
pub enum Metric {
    #[default]
    Hops,
    EdgeLength(fn(Option<&str>) -> f64),
}

impl Metric {
    fn length(&self, kind: Option<&str>) -> f64 {
        match self {
            Metric::Hops => 1.0,
            Metric::EdgeLength(f) => f(kind),
        }
    }
}

/// Dense symmetric n×n shortest-path matrix over a component's local node ordering.
/// Zero diagonal; all entries finite for connected input.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Floyd–Warshall over the component's induced adjacency.
    ///
    /// Components on the exact-layout path are small (≤ a few hundred nodes), so the
    /// dense cube is fine. Parallel edges take the minimum length; self-loops add
    /// nothing beyond the zero diagonal.
    pub fn build(comp: &Component, metric: Metric) -> Self {
        let n = comp.len();
        let mut data = vec![f64::INFINITY; n * n];
        for i in 0..n {
            data[i * n + i] = 0.0;
        }

        for e in &comp.edges {
            if e.a == e.b {
                continue;
            }
            let len = metric.length(e.kind.as_deref());
            let cur = data[e.a * n + e.b];
            if len < cur {
                data[e.a * n + e.b] = len;
                data[e.b * n + e.a] = len;
            }
        }

        for k in 0..n {
            for i in 0..n {
                let dik = data[i * n + k];
                if !dik.is_finite() {
                    continue;
                }
                for j in 0..n {
                    let through = dik + data[k * n + j];
                    if through < data[i * n + j] {
                        data[i * n + j] = through;
                        data[j * n + i] = through;
                    }
                }
            }
        }

        Self { n, data }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }
}
