//! Structural fingerprints for table detection and row deduplication.

use std::collections::HashMap;

use crate::figma::api_types::RawNode;

/// Window of leading children inspected when classifying a container.
const DETECTION_WINDOW: usize = 10;
/// Repeats of one structure signature that mark a container as tabular.
const DETECTION_REPEATS: usize = 3;
/// Exemplar rows kept per table container.
pub const MAX_TABLE_ROWS: usize = 3;

/// Shallow structural signature: type, child count, and the sorted set of
/// distinct child types, down to depth 2 through the first three children.
pub fn structure_signature(node: &RawNode) -> String {
    fn build(node: &RawNode, level: usize, out: &mut String) {
        if level > 2 {
            return;
        }
        if !out.is_empty() {
            out.push('|');
        }
        out.push_str(&node.node_type);
        out.push_str(&format!("[{}]", node.children.len()));

        let mut child_types: Vec<&str> = node
            .children
            .iter()
            .map(|c| c.node_type.as_str())
            .collect();
        child_types.sort_unstable();
        child_types.dedup();
        if !child_types.is_empty() {
            out.push('(');
            out.push_str(&child_types.join(","));
            out.push(')');
        }

        for child in node.children.iter().take(3) {
            build(child, level + 1, out);
        }
    }

    let mut out = String::new();
    build(node, 0, &mut out);
    out
}

/// Content signature: truncated text for TEXT nodes, `type[childCount]` for
/// container-like nodes, through the first five children. Falls back to the
/// structure signature when nothing was emitted.
pub fn content_signature(node: &RawNode) -> String {
    fn build(node: &RawNode, out: &mut Vec<String>) {
        match node.node_type.as_str() {
            "TEXT" => {
                if let Some(text) = node.characters.as_deref() {
                    let truncated: String = text.chars().take(20).collect();
                    if !truncated.is_empty() {
                        out.push(truncated);
                    }
                }
            }
            "FRAME" | "GROUP" | "INSTANCE" => {
                out.push(format!("{}[{}]", node.node_type, node.children.len()));
            }
            _ => {}
        }
        for child in node.children.iter().take(5) {
            build(child, out);
        }
    }

    let mut parts = Vec::new();
    build(node, &mut parts);
    if parts.is_empty() {
        structure_signature(node)
    } else {
        parts.join("|")
    }
}

/// A node is a table container when it has more than three children and, in
/// the leading window, some structure signature repeats at least three times.
pub fn is_table_container(node: &RawNode) -> bool {
    if node.children.len() <= 3 {
        return false;
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    for child in node.children.iter().take(DETECTION_WINDOW) {
        let count = seen.entry(structure_signature(child)).or_insert(0);
        *count += 1;
        if *count >= DETECTION_REPEATS {
            return true;
        }
    }
    false
}

/// Per-container row bookkeeping. `row_count` counts kept rows.
#[derive(Debug, Default)]
pub struct TableCounter {
    row_count: usize,
    rows_seen: HashMap<String, usize>,
}

impl TableCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a row with this content signature is kept. Repeats are
    /// admitted only while fewer than [`MAX_TABLE_ROWS`] rows are kept.
    pub fn admit(&mut self, signature: &str) -> bool {
        let count = self.rows_seen.entry(signature.to_string()).or_insert(0);
        *count += 1;

        if *count == 1 || self.row_count < MAX_TABLE_ROWS {
            self.row_count += 1;
            true
        } else {
            false
        }
    }

    /// Total rows observed, kept or not.
    pub fn total_observed(&self) -> usize {
        self.rows_seen.values().sum()
    }

    pub fn dropped(&self) -> usize {
        self.total_observed() - self.row_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> RawNode {
        serde_json::from_value(value).expect("node fixture")
    }

    fn row(k: usize) -> serde_json::Value {
        json!({
            "id": format!("1:{k}"), "name": format!("Row {k}"), "type": "FRAME",
            "children": [
                {"id": format!("1:{k}a"), "name": "Name", "type": "TEXT", "characters": format!("Row {k} name")},
                {"id": format!("1:{k}b"), "name": "Value", "type": "TEXT", "characters": format!("Row {k} value")}
            ]
        })
    }

    #[test]
    fn structure_signature_is_stable_across_text_content() {
        let a = node(row(1));
        let b = node(row(2));
        assert_eq!(structure_signature(&a), structure_signature(&b));
    }

    #[test]
    fn structure_signature_distinguishes_child_shapes() {
        let two_texts = node(row(1));
        let one_text = node(json!({
            "id": "2:1", "name": "Row", "type": "FRAME",
            "children": [{"id": "2:2", "name": "Name", "type": "TEXT"}]
        }));
        assert_ne!(structure_signature(&two_texts), structure_signature(&one_text));
    }

    #[test]
    fn content_signature_truncates_text_to_twenty_chars() {
        let long = node(json!({
            "id": "1:1", "name": "T", "type": "TEXT",
            "characters": "abcdefghijklmnopqrstuvwxyz"
        }));
        assert_eq!(content_signature(&long), "abcdefghijklmnopqrst");
    }

    #[test]
    fn content_signature_falls_back_to_structure() {
        let vector = node(json!({"id": "1:1", "name": "V", "type": "VECTOR"}));
        assert_eq!(content_signature(&vector), structure_signature(&vector));
    }

    #[test]
    fn three_repeats_trigger_table_detection() {
        let container = node(json!({
            "id": "0:1", "name": "Table", "type": "FRAME",
            "children": [row(1), row(2), row(3), {"id": "h", "name": "Header", "type": "TEXT", "characters": "h"}]
        }));
        assert!(is_table_container(&container));
    }

    #[test]
    fn two_repeats_do_not_trigger_detection() {
        let container = node(json!({
            "id": "0:1", "name": "Almost", "type": "FRAME",
            "children": [
                row(1), row(2),
                {"id": "a", "name": "A", "type": "TEXT", "characters": "a"},
                {"id": "b", "name": "B", "type": "VECTOR"}
            ]
        }));
        assert!(!is_table_container(&container));
    }

    #[test]
    fn detection_needs_more_than_three_children() {
        let container = node(json!({
            "id": "0:1", "name": "Small", "type": "FRAME",
            "children": [row(1), row(2), row(3)]
        }));
        assert!(!is_table_container(&container));
    }

    #[test]
    fn counter_caps_kept_rows_at_three() {
        let mut counter = TableCounter::new();
        let kept: Vec<bool> = (0..7).map(|_| counter.admit("same")).collect();
        assert_eq!(kept, vec![true, true, true, false, false, false, false]);
        assert_eq!(counter.total_observed(), 7);
        assert_eq!(counter.dropped(), 4);
    }

    #[test]
    fn distinct_signatures_are_always_admitted() {
        let mut counter = TableCounter::new();
        for k in 0..5 {
            assert!(counter.admit(&format!("sig-{k}")));
        }
        assert_eq!(counter.dropped(), 0);
    }
}
