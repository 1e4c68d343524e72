//! Connected-component decomposition.

use skein_graph::Graph;
use std::collections::VecDeque;

/// A maximal connected induced subgraph, with members in deterministic discovery order
/// and induced edges re-indexed against that order.
#[derive(Debug, Clone)]
pub struct Component {
    pub node_ids: Vec<String>,
    pub edges: Vec<LocalEdge>,
}

/// An induced edge between local node indices. Parallel edges and self-loops survive.
#[derive(Debug, Clone)]
pub struct LocalEdge {
    pub a: usize,
    pub b: usize,
    pub kind: Option<String>,
}

impl Component {
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }
}

/// Splits a graph into its connected components, treating every edge as undirected.
///
/// Traversal is an explicit queue (never recursion, which would overflow on large
/// components). Isolated nodes form singleton components; an empty graph yields an
/// empty list. Every node lands in exactly one component.
pub fn decompose(g: &Graph) -> Vec<Component> {
    let n = g.node_count();
    let mut component_of: Vec<Option<usize>> = vec![None; n];
    let mut local_of: Vec<usize> = vec![0; n];
    let mut components: Vec<Component> = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    for start in 0..n {
        if component_of[start].is_some() {
            continue;
        }
        let comp_idx = components.len();
        let mut node_ids: Vec<String> = Vec::new();

        component_of[start] = Some(comp_idx);
        local_of[start] = 0;
        node_ids.push(g.node_id(start).to_string());
        queue.push_back(start);

        while let Some(v) = queue.pop_front() {
            for e in g.node_edges(g.node_id(v)) {
                for endpoint in [e.from.as_str(), e.to.as_str()] {
                    let u = g
                        .node_index_of(endpoint)
                        .expect("edge endpoints are graph nodes");
                    if component_of[u].is_none() {
                        component_of[u] = Some(comp_idx);
                        local_of[u] = node_ids.len();
                        node_ids.push(endpoint.to_string());
                        queue.push_back(u);
                    }
                }
            }
        }

        components.push(Component {
            node_ids,
            edges: Vec::new(),
        });
    }

    // Edges partition with the nodes; one pass assigns each to its component.
    for e in g.edges() {
        let from = g.node_index_of(&e.from).expect("edge endpoint");
        let to = g.node_index_of(&e.to).expect("edge endpoint");
        let comp_idx = component_of[from].expect("all nodes assigned");
        debug_assert_eq!(component_of[to], Some(comp_idx));
        components[comp_idx].edges.push(LocalEdge {
            a: local_of[from],
            b: local_of[to],
            kind: e.kind.clone(),
        });
    }

    components
}
