//! Depth-distribution analysis of a raw document.
//!
//! Walks the visible tree and estimates, per depth, how much serialized
//! output each layer would contribute, then recommends a depth that keeps
//! roughly 80% of the nodes.

use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

use crate::figma::api_types::{RawNode, RawResponse};

/// Estimated serialized characters per style block.
const STYLE_BLOCK_CHARS: u64 = 200;
/// Estimated serialized characters per fill entry.
const FILL_CHARS: u64 = 100;
/// Estimated serialized characters per effect entry.
const EFFECT_CHARS: u64 = 150;
/// Representative samples kept per depth.
const MAX_SAMPLES: usize = 3;
/// Cumulative node share the recommended depth must reach.
const TARGET_PERCENT: f64 = 80.0;

#[derive(Debug, Clone)]
pub struct NodeSample {
    pub node_type: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct DepthLevel {
    pub count: u64,
    pub chars: u64,
    pub samples: Vec<NodeSample>,
}

#[derive(Debug, Clone, Default)]
pub struct DepthStats {
    pub max_depth: usize,
    pub total_nodes: u64,
    pub total_chars: u64,
    pub levels: BTreeMap<usize, DepthLevel>,
}

impl DepthStats {
    /// Estimated serialized size in KB for a typical YAML rendering.
    pub fn estimated_kb(&self) -> f64 {
        self.total_chars as f64 * 1.2 * 0.8 / 1024.0
    }

    /// Estimated token count (chars / 4).
    pub fn estimated_tokens(&self) -> u64 {
        self.total_chars / 4
    }

    /// Smallest depth whose cumulative node share reaches 80%.
    pub fn recommended_depth(&self) -> usize {
        if self.total_nodes == 0 {
            return 0;
        }
        let mut cumulative = 0u64;
        for (depth, level) in &self.levels {
            cumulative += level.count;
            if cumulative as f64 / self.total_nodes as f64 * 100.0 >= TARGET_PERCENT {
                return *depth;
            }
        }
        self.max_depth
    }

    /// Human-readable report with the per-depth table.
    pub fn format_report(&self) -> String {
        let mut out = String::new();
        writeln!(out, "Depth analysis").ok();
        writeln!(out, "  Max depth:   {}", self.max_depth).ok();
        writeln!(out, "  Total nodes: {}", self.total_nodes).ok();
        writeln!(
            out,
            "  Estimated size: {:.1} KB (~{} tokens)",
            self.estimated_kb(),
            self.estimated_tokens()
        )
        .ok();
        writeln!(out).ok();
        writeln!(
            out,
            "  {:>5}  {:>6}  {:>6}  {:>8}  {:>10}  examples",
            "depth", "nodes", "pct", "cum pct", "cum KB"
        )
        .ok();

        let mut cumulative_nodes = 0u64;
        let mut cumulative_chars = 0u64;
        for (depth, level) in &self.levels {
            cumulative_nodes += level.count;
            cumulative_chars += level.chars;
            let pct = level.count as f64 / self.total_nodes.max(1) as f64 * 100.0;
            let cum_pct = cumulative_nodes as f64 / self.total_nodes.max(1) as f64 * 100.0;
            let cum_kb = cumulative_chars as f64 * 1.2 * 0.8 / 1024.0;
            let examples = level
                .samples
                .iter()
                .map(|s| format!("{} \"{}\"", s.node_type, truncate(&s.name, 24)))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                out,
                "  {:>5}  {:>6}  {:>5.1}%  {:>7.1}%  {:>8.1}KB  {}",
                depth, level.count, pct, cum_pct, cum_kb, examples
            )
            .ok();
        }

        writeln!(out).ok();
        writeln!(
            out,
            "  Recommended depth: {} (covers >= {:.0}% of nodes)",
            self.recommended_depth(),
            TARGET_PERCENT
        )
        .ok();
        out
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect::<String>() + "…"
    }
}

/// Estimated serialized contribution of one node.
fn node_chars(node: &RawNode) -> u64 {
    let mut chars = (node.id.len() + node.name.len() + node.node_type.len()) as u64;
    if node.style.is_some() {
        chars += STYLE_BLOCK_CHARS;
    }
    chars += node.fills.len() as u64 * FILL_CHARS;
    chars += node.effects.len() as u64 * EFFECT_CHARS;
    if let Some(text) = &node.characters {
        chars += text.len() as u64;
    }
    chars
}

fn walk(node: &RawNode, depth: usize, stats: &mut DepthStats) {
    stats.total_nodes += 1;
    stats.max_depth = stats.max_depth.max(depth);

    let chars = node_chars(node);
    stats.total_chars += chars;

    let level = stats.levels.entry(depth).or_default();
    level.count += 1;
    level.chars += chars;
    if level.samples.len() < MAX_SAMPLES {
        level.samples.push(NodeSample {
            node_type: node.node_type.clone(),
            name: node.name.clone(),
        });
    }

    for child in &node.children {
        if child.visible {
            walk(child, depth + 1, stats);
        }
    }
}

/// Analyze a single document tree.
pub fn analyze_tree(root: &RawNode) -> DepthStats {
    let mut stats = DepthStats::default();
    if root.visible {
        walk(root, 0, &mut stats);
    }
    stats
}

/// Analyze either response shape. Node-endpoint entries all start at depth 0.
pub fn analyze_response(raw: &RawResponse) -> DepthStats {
    match raw {
        RawResponse::File(file) => analyze_tree(&file.document),
        RawResponse::Nodes(response) => {
            let mut stats = DepthStats::default();
            for entry in response.nodes.values() {
                if entry.document.visible {
                    walk(&entry.document, 0, &mut stats);
                }
            }
            stats
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> RawNode {
        serde_json::from_value(value).expect("node fixture")
    }

    fn wide_tree() -> RawNode {
        // Depth 0: 1 node, depth 1: 8 nodes, depth 2: 1 node.
        let children: Vec<serde_json::Value> = (0..8)
            .map(|k| {
                if k == 0 {
                    json!({"id": format!("1:{k}"), "name": format!("Child {k}"), "type": "FRAME",
                           "children": [{"id": "2:0", "name": "Leaf", "type": "TEXT", "characters": "deep"}]})
                } else {
                    json!({"id": format!("1:{k}"), "name": format!("Child {k}"), "type": "FRAME"})
                }
            })
            .collect();
        node(json!({"id": "0:1", "name": "Root", "type": "FRAME", "children": children}))
    }

    #[test]
    fn counts_nodes_per_depth_and_respects_visibility() {
        let root = node(json!({
            "id": "0:1", "name": "Root", "type": "FRAME",
            "children": [
                {"id": "1:1", "name": "Shown", "type": "FRAME"},
                {"id": "1:2", "name": "Hidden", "type": "FRAME", "visible": false,
                 "children": [{"id": "1:3", "name": "Buried", "type": "TEXT", "characters": "x"}]}
            ]
        }));

        let stats = analyze_tree(&root);
        assert_eq!(stats.total_nodes, 2);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.levels[&0].count, 1);
        assert_eq!(stats.levels[&1].count, 1);
    }

    #[test]
    fn char_estimate_includes_style_fill_effect_weights() {
        let root = node(json!({
            "id": "1", "name": "T", "type": "TEXT",
            "characters": "hello",
            "style": {"fontFamily": "Inter"},
            "fills": [{"type": "SOLID", "color": {"r": 0.0, "g": 0.0, "b": 0.0}}],
            "effects": [{"type": "DROP_SHADOW", "radius": 2.0}]
        }));

        let stats = analyze_tree(&root);
        // id(1) + name(1) + type(4) + style(200) + fill(100) + effect(150) + text(5)
        assert_eq!(stats.total_chars, 461);
        assert_eq!(stats.estimated_tokens(), 461 / 4);
    }

    #[test]
    fn recommended_depth_reaches_eighty_percent() {
        // 1 + 8 of 10 nodes at depths 0-1 = 90% >= 80%.
        let stats = analyze_tree(&wide_tree());
        assert_eq!(stats.total_nodes, 10);
        assert_eq!(stats.recommended_depth(), 1);
    }

    #[test]
    fn samples_are_capped_at_three() {
        let stats = analyze_tree(&wide_tree());
        assert_eq!(stats.levels[&1].samples.len(), 3);
    }

    #[test]
    fn report_contains_summary_lines_and_table() {
        let stats = analyze_tree(&wide_tree());
        let report = stats.format_report();
        assert!(report.contains("Max depth:   2"));
        assert!(report.contains("Total nodes: 10"));
        assert!(report.contains("Recommended depth: 1"));
        assert!(report.contains("cum pct"));
    }
}
