//! Line-based graph description format.
//!
//! ```text
//! # comment
//! protein1 gene2 interacts_with
//! lonely_node
//! # _attributes protein1 pinned=0 pos=12.5,-3
//! ```
//!
//! Plain lines are whitespace-separated: `from to [kind]` declares an edge, a bare id
//! declares an isolated node. `#` starts a comment, except the `# _attributes` directive
//! which assigns `key=value` pairs to a node. Values run to the next whitespace and may
//! contain commas; keys may not contain `=`.

use crate::graph::Graph;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: attribute directive names no node")]
    DirectiveMissingNode { line: usize },

    #[error("line {line}: malformed attribute `{token}` (expected key=value)")]
    MalformedAttribute { line: usize, token: String },

    #[error("line {line}: expected `from to [kind]` or a bare node id, got {fields} fields")]
    MalformedLine { line: usize, fields: usize },
}

const ATTRIBUTES_DIRECTIVE: &str = "_attributes";

pub fn parse(text: &str) -> Result<Graph> {
    let mut g = Graph::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(comment) = trimmed.strip_prefix('#') {
            let comment = comment.trim_start();
            if let Some(rest) = comment.strip_prefix(ATTRIBUTES_DIRECTIVE) {
                if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                    parse_attributes(&mut g, rest, line)?;
                }
            }
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let first = fields.next().expect("non-empty line has a first field");
        match (fields.next(), fields.next(), fields.next()) {
            (None, _, _) => {
                g.ensure_node(first);
            }
            (Some(to), kind, None) => {
                g.add_edge(first, to, kind.map(str::to_string));
            }
            _ => {
                return Err(ParseError::MalformedLine {
                    line,
                    fields: trimmed.split_whitespace().count(),
                });
            }
        }
    }

    Ok(g)
}

fn parse_attributes(g: &mut Graph, rest: &str, line: usize) -> Result<()> {
    let mut fields = rest.split_whitespace();
    let Some(node) = fields.next() else {
        return Err(ParseError::DirectiveMissingNode { line });
    };
    g.ensure_node(node);

    for token in fields {
        let Some((key, value)) = token.split_once('=') else {
            return Err(ParseError::MalformedAttribute {
                line,
                token: token.to_string(),
            });
        };
        if key.is_empty() {
            return Err(ParseError::MalformedAttribute {
                line,
                token: token.to_string(),
            });
        }
        g.set_attr(node, key, value);
    }

    Ok(())
}

/// Serializes a graph so that `parse(&write(&g))` reproduces it, node ordering included.
///
/// Every node is listed explicitly before the edges; reading the output therefore
/// re-creates nodes in the same insertion order, which the layout engine relies on for
/// reproducible per-node seeding.
pub fn write(g: &Graph) -> String {
    let mut out = String::new();

    for id in g.node_ids() {
        out.push_str(id);
        out.push('\n');
    }

    for e in g.edges() {
        out.push_str(&e.from);
        out.push(' ');
        out.push_str(&e.to);
        if let Some(kind) = &e.kind {
            out.push(' ');
            out.push_str(kind);
        }
        out.push('\n');
    }

    for id in g.node_ids() {
        let Some(attrs) = g.attrs(id) else {
            continue;
        };
        if attrs.is_empty() {
            continue;
        }
        out.push_str("# ");
        out.push_str(ATTRIBUTES_DIRECTIVE);
        out.push(' ');
        out.push_str(id);
        for (key, value) in attrs {
            out.push(' ');
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out.push('\n');
    }

    out
}
