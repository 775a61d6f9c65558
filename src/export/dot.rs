//! DOT rendering of IR trees for Graphviz inspection.
//!
//! Debugging a devirtualization run usually means staring at the recovered trees next
//! to the control flow graph. This module renders a unit's blocks as DOT nodes, one
//! per control flow node, with the formatted statements as the label. The control flow
//! graph itself stays externally owned; its edges are passed in.
//!
//! Long statements are wrapped at a fixed column with the DOT left-justified line
//! break (`\l`) and an indentation prefix on continuation lines, which keeps block
//! labels readable without distorting node widths.

use std::fmt::Write;

use crate::ast::{
    cil::{CilAstFormatter, CilUnit},
    CfgNodeId,
};

/// Column at which block labels wrap.
pub const LABEL_WRAP_COLUMN: usize = 100;

/// Prefix on wrapped continuation lines.
const CONTINUATION_INDENT: &str = "     ";

/// Escapes a string for use inside a DOT label.
#[must_use]
pub fn escape_dot(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            '<' => escaped.push_str("\\<"),
            '>' => escaped.push_str("\\>"),
            '{' => escaped.push_str("\\{"),
            '}' => escaped.push_str("\\}"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Builds a label from statement lines, wrapping each at `max_line_length` characters.
///
/// Every emitted chunk ends with the `\l` left-justified break; chunks past the first
/// of a wrapped line carry the continuation indent.
#[must_use]
pub fn wrap_label<'a>(lines: impl IntoIterator<Item = &'a str>, max_line_length: usize) -> String {
    let mut label = String::new();
    for line in lines {
        let characters: Vec<char> = line.chars().collect();
        if characters.is_empty() {
            label.push_str("\\l");
            continue;
        }
        let mut offset = 0;
        while offset < characters.len() {
            let end = usize::min(offset + max_line_length, characters.len());
            let chunk: String = characters[offset..end].iter().collect();
            if offset > 0 {
                label.push_str(CONTINUATION_INDENT);
            }
            label.push_str(&escape_dot(&chunk));
            label.push_str("\\l");
            offset = end;
        }
    }
    label
}

/// Accumulates nodes and edges, then renders a `digraph`.
pub struct DotGraph {
    name: String,
    nodes: Vec<(String, String)>,
    edges: Vec<(String, String)>,
}

impl DotGraph {
    /// Creates an empty graph with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a node with a pre-escaped label (see [`wrap_label`]).
    pub fn add_node(&mut self, id: impl Into<String>, label: impl Into<String>) {
        self.nodes.push((id.into(), label.into()));
    }

    /// Adds a directed edge between two node ids.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.edges.push((from.into(), to.into()));
    }

    /// Renders the graph in DOT syntax.
    #[must_use]
    pub fn build(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph {} {{", self.name);
        let _ = writeln!(out, "    node [shape=box fontname=\"monospace\"];");
        for (id, label) in &self.nodes {
            let _ = writeln!(out, "    {id} [label=\"{label}\"];");
        }
        for (from, to) in &self.edges {
            let _ = writeln!(out, "    {from} -> {to};");
        }
        out.push_str("}\n");
        out
    }
}

/// Renders a unit's blocks and the given control flow edges as a DOT graph.
#[must_use]
pub fn export_unit(unit: &CilUnit, edges: &[(CfgNodeId, CfgNodeId)]) -> String {
    let mut formatter = CilAstFormatter::new();
    let mut graph = DotGraph::new("unit");

    for (cfg, block) in unit.blocks() {
        let text = formatter.format(unit, block);
        let label = wrap_label(text.lines(), LABEL_WRAP_COLUMN);
        graph.add_node(format!("block_{}", cfg.index()), label);
    }
    for (from, to) in edges {
        graph.add_edge(
            format!("block_{}", from.index()),
            format!("block_{}", to.index()),
        );
    }
    graph.build()
}
