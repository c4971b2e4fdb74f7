//! Visualization and summary of a graph structure
//!
//! Three renderings are supported:
//! 1. `text`: one line per node listing its outgoing edges
//! 2. `dot`: a Graphviz digraph
//! 3. `mermaid`: a Mermaid flowchart

use super::node::Node;
use super::store::GraphStructure;
use super::types::{NodeId, StructureKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for `visualize_structure`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualFormat {
    #[default]
    Text,
    /// Graphviz
    Dot,
    Mermaid,
}

impl VisualFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualFormat::Text => "text",
            VisualFormat::Dot => "dot",
            VisualFormat::Mermaid => "mermaid",
        }
    }
}

impl fmt::Display for VisualFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "ascii" => Ok(VisualFormat::Text),
            "dot" | "graphviz" => Ok(VisualFormat::Dot),
            "mermaid" => Ok(VisualFormat::Mermaid),
            _ => Err(s.to_string()),
        }
    }
}

/// Render `structure`, showing at most `max_nodes` nodes.
///
/// Edges into hidden nodes are dropped and a trailing note reports how many
/// nodes were left out.
pub fn render(structure: &GraphStructure, format: VisualFormat, max_nodes: Option<usize>) -> String {
    let shown: Vec<&Node> = match max_nodes {
        Some(limit) => structure.nodes().take(limit).collect(),
        None => structure.nodes().collect(),
    };
    let hidden = structure.node_count() - shown.len();
    let visible = |id: &NodeId| shown.iter().any(|node| node.id() == *id);

    match format {
        VisualFormat::Text => render_text(structure, &shown, hidden, visible),
        VisualFormat::Dot => render_dot(structure, &shown, hidden, visible),
        VisualFormat::Mermaid => render_mermaid(&shown, hidden, visible),
    }
}

fn render_text(
    structure: &GraphStructure,
    shown: &[&Node],
    hidden: usize,
    visible: impl Fn(&NodeId) -> bool,
) -> String {
    let mut output = format!(
        "{} graph: {} nodes, {} edges\n",
        structure.kind(),
        structure.node_count(),
        structure.edge_count()
    );
    for node in shown {
        let marker = if structure.root() == Some(node.id()) { "*" } else { " " };
        output.push_str(&format!("{} n{} = {}", marker, node.id().as_u64(), node.value().repr()));
        let edges: Vec<String> = node
            .outgoing()
            .iter()
            .filter(|(target, _)| visible(target))
            .map(|(target, meta)| format!("n{} [{}]", target.as_u64(), meta))
            .collect();
        if !edges.is_empty() {
            output.push_str(" -> ");
            output.push_str(&edges.join(", "));
        }
        output.push('\n');
    }
    if hidden > 0 {
        output.push_str(&format!("  ... {} more nodes\n", hidden));
    }
    output
}

fn render_dot(
    structure: &GraphStructure,
    shown: &[&Node],
    hidden: usize,
    visible: impl Fn(&NodeId) -> bool,
) -> String {
    let mut output = format!("digraph {} {{\n", structure.kind());
    output.push_str("  rankdir=LR;\n");
    output.push_str("  node [shape=box];\n");

    for node in shown {
        let style = if structure.root() == Some(node.id()) {
            ", style=bold"
        } else {
            ""
        };
        output.push_str(&format!(
            "  n{} [label=\"{}\"{}];\n",
            node.id().as_u64(),
            escape_dot(&node.value().repr()),
            style
        ));
    }
    for node in shown {
        for (target, meta) in node.outgoing() {
            if !visible(target) {
                continue;
            }
            output.push_str(&format!(
                "  n{} -> n{} [label=\"{}\"];\n",
                node.id().as_u64(),
                target.as_u64(),
                escape_dot(&meta.tag())
            ));
        }
    }
    if hidden > 0 {
        output.push_str(&format!("  // {} more nodes\n", hidden));
    }
    output.push_str("}\n");
    output
}

fn render_mermaid(shown: &[&Node], hidden: usize, visible: impl Fn(&NodeId) -> bool) -> String {
    let mut output = String::from("graph LR\n");
    for node in shown {
        output.push_str(&format!(
            "  n{}[\"{}\"]\n",
            node.id().as_u64(),
            escape_mermaid(&node.value().repr())
        ));
    }
    for node in shown {
        for (target, meta) in node.outgoing() {
            if !visible(target) {
                continue;
            }
            output.push_str(&format!(
                "  n{} -->|{}| n{}\n",
                node.id().as_u64(),
                escape_mermaid(&meta.tag()),
                target.as_u64()
            ));
        }
    }
    if hidden > 0 {
        output.push_str(&format!("  %% {} more nodes\n", hidden));
    }
    output
}

fn escape_dot(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

fn escape_mermaid(label: &str) -> String {
    label.replace('"', "#quot;").replace('|', "#124;")
}

/// Snapshot of a structure's shape and governance state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub kind: StructureKind,
    pub node_count: usize,
    pub edge_count: usize,
    pub root: Option<NodeId>,
    pub components: usize,
    pub connected: bool,
    pub active_rules: Vec<String>,
    pub disabled_rules: Vec<String>,
    pub customized: bool,
    pub metadata_keys: Vec<String>,
}

impl GraphSummary {
    pub fn of(structure: &GraphStructure) -> Self {
        let components = structure.connected_components().len();
        let control = structure.control();
        GraphSummary {
            kind: structure.kind(),
            node_count: structure.node_count(),
            edge_count: structure.edge_count(),
            root: structure.root(),
            components,
            connected: components <= 1,
            active_rules: control.get_active_rules(),
            disabled_rules: control.disabled_rules(),
            customized: control.is_customized(),
            metadata_keys: structure.metadata().keys().map(str::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::control::NO_BACKWARD_EDGES;
    use crate::graph::sequential::SequentialGraph;

    #[test]
    fn test_parse_format() {
        assert_eq!("DOT".parse::<VisualFormat>(), Ok(VisualFormat::Dot));
        assert_eq!("mermaid".parse::<VisualFormat>(), Ok(VisualFormat::Mermaid));
        assert_eq!("svg".parse::<VisualFormat>(), Err("svg".to_string()));
    }

    #[test]
    fn test_text_rendering() {
        let seq = SequentialGraph::from_values([1, 2]).unwrap();
        let text = render(seq.graph(), VisualFormat::Text, None);
        let first = seq.order()[0].as_u64();
        let second = seq.order()[1].as_u64();

        assert!(text.starts_with("sequential graph: 2 nodes, 1 edges"));
        assert!(text.contains(&format!("* n{} = 1 -> n{} [seq:0]", first, second)));
    }

    #[test]
    fn test_dot_and_mermaid() {
        let seq = SequentialGraph::from_values(["a", "b"]).unwrap();
        let dot = render(seq.graph(), VisualFormat::Dot, None);
        assert!(dot.starts_with("digraph sequential {"));
        assert!(dot.contains("[label=\"\\\"a\\\"\", style=bold]"));
        assert!(dot.contains("[label=\"seq:0\"]"));
        assert!(dot.trim_end().ends_with('}'));

        let mermaid = render(seq.graph(), VisualFormat::Mermaid, None);
        assert!(mermaid.starts_with("graph LR"));
        assert!(mermaid.contains("#quot;a#quot;"));
        assert!(mermaid.contains("-->|seq:0|"));
    }

    #[test]
    fn test_node_limit() {
        let seq = SequentialGraph::from_values([1, 2, 3, 4]).unwrap();
        let dot = render(seq.graph(), VisualFormat::Dot, Some(2));
        assert_eq!(dot.matches(" -> ").count(), 1);
        assert!(dot.contains("// 2 more nodes"));
    }

    #[test]
    fn test_summary() {
        let mut seq = SequentialGraph::from_values([1, 2, 3]).unwrap();
        seq.control_mut().disable_rule(NO_BACKWARD_EDGES).unwrap();
        let summary = GraphSummary::of(seq.graph());

        assert_eq!(summary.kind, StructureKind::Sequential);
        assert_eq!(summary.node_count, 3);
        assert_eq!(summary.edge_count, 2);
        assert!(summary.connected);
        assert_eq!(summary.disabled_rules, vec![NO_BACKWARD_EDGES.to_string()]);
        assert!(!summary.active_rules.contains(&NO_BACKWARD_EDGES.to_string()));
        assert!(!summary.customized);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["kind"], "sequential");
    }
}
