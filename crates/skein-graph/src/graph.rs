use rustc_hash::FxBuildHasher;
use std::collections::BTreeMap;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Node position attribute, serialized as `"x,y"`.
pub const POS_KEY: &str = "pos";
/// Pinned flag attribute, `"0"` or `"1"`. Pinned nodes are excluded from automatic movement.
pub const PINNED_KEY: &str = "pinned";
/// Marker attribute for nodes the host treats specially; carried through layout untouched.
pub const SPECIAL_KEY: &str = "special";

#[derive(Debug, Clone)]
struct NodeEntry {
    id: String,
    attrs: BTreeMap<String, String>,
}

/// An ordered pair of node ids. Direction is ignored for connectivity purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// Optional link-type label from the description format.
    pub kind: Option<String>,
}

/// Insertion-ordered multigraph with per-node string attributes.
///
/// Nodes are addressed by stable string ids. Parallel edges and self-loops are legal;
/// incident-edge queries cover both directions.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<NodeEntry>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    // Edge indices incident to each node, aligned with `nodes`. A self-loop is recorded once.
    incident: Vec<Vec<usize>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Adds the node if it is not present; returns its index in insertion order.
    pub fn ensure_node(&mut self, id: impl Into<String>) -> usize {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            attrs: BTreeMap::new(),
        });
        self.node_index.insert(id, idx);
        self.incident.push(Vec::new());
        idx
    }

    pub fn node_id(&self, idx: usize) -> &str {
        &self.nodes[idx].id
    }

    pub fn node_index_of(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        kind: Option<String>,
    ) {
        let from = from.into();
        let to = to.into();
        let from_idx = self.ensure_node(from.clone());
        let to_idx = self.ensure_node(to.clone());

        let edge_idx = self.edges.len();
        self.edges.push(Edge { from, to, kind });
        self.incident[from_idx].push(edge_idx);
        if to_idx != from_idx {
            self.incident[to_idx].push(edge_idx);
        }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges incident to `id`, irrespective of direction. Empty for unknown ids.
    pub fn node_edges(&self, id: &str) -> impl Iterator<Item = &Edge> {
        let indices = self
            .node_index
            .get(id)
            .map(|&idx| self.incident[idx].as_slice())
            .unwrap_or(&[]);
        indices.iter().map(|&e| &self.edges[e])
    }

    pub fn degree(&self, id: &str) -> usize {
        self.node_index
            .get(id)
            .map(|&idx| self.incident[idx].len())
            .unwrap_or(0)
    }

    pub fn attr(&self, id: &str, key: &str) -> Option<&str> {
        let &idx = self.node_index.get(id)?;
        self.nodes[idx].attrs.get(key).map(String::as_str)
    }

    /// Sets an attribute, adding the node if needed.
    pub fn set_attr(&mut self, id: &str, key: impl Into<String>, value: impl Into<String>) {
        let idx = self.ensure_node(id);
        self.nodes[idx].attrs.insert(key.into(), value.into());
    }

    pub fn attrs(&self, id: &str) -> Option<&BTreeMap<String, String>> {
        let &idx = self.node_index.get(id)?;
        Some(&self.nodes[idx].attrs)
    }

    pub fn position(&self, id: &str) -> Option<(f64, f64)> {
        let raw = self.attr(id, POS_KEY)?;
        let (x, y) = raw.split_once(',')?;
        Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
    }

    pub fn set_position(&mut self, id: &str, x: f64, y: f64) {
        self.set_attr(id, POS_KEY, format!("{x},{y}"));
    }

    pub fn pinned(&self, id: &str) -> bool {
        self.attr(id, PINNED_KEY) == Some("1")
    }

    pub fn set_pinned(&mut self, id: &str, pinned: bool) {
        self.set_attr(id, PINNED_KEY, if pinned { "1" } else { "0" });
    }

    pub fn is_special(&self, id: &str) -> bool {
        self.attr(id, SPECIAL_KEY) == Some("1")
    }
}
