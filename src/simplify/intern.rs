//! Content-addressed store for repeated style values.
//!
//! Values are canonicalized (key-sorted JSON) before lookup so equal styles
//! share one id. After the traversal, [`StyleInterner::finalize`] inlines
//! every id used fewer than three times and prunes it from the table.

use std::collections::{BTreeMap, HashMap};

use crate::types::{GlobalVars, SimplifiedNode, StyleSlot, StyleValue};

/// Ids used fewer than this many times are inlined at finalize.
pub const INLINE_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylePrefix {
    Text,
    Fill,
    Stroke,
    Effect,
    Layout,
}

impl StylePrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            StylePrefix::Text => "style",
            StylePrefix::Fill => "fill",
            StylePrefix::Stroke => "stroke",
            StylePrefix::Effect => "effect",
            StylePrefix::Layout => "layout",
        }
    }
}

#[derive(Debug, Default)]
pub struct StyleInterner {
    styles: BTreeMap<String, StyleValue>,
    lookup: HashMap<String, String>,
    usage_count: HashMap<String, u32>,
    next_id: u32,
}

impl StyleInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical form used for value equality: JSON with object keys sorted.
    fn canonical_key(prefix: StylePrefix, value: &StyleValue) -> String {
        // serde_json::Value objects are BTreeMap-backed, so serializing the
        // round-tripped value sorts keys.
        let canonical = serde_json::to_value(value)
            .and_then(|v| serde_json::to_string(&v))
            .unwrap_or_default();
        format!("{}:{}", prefix.as_str(), canonical)
    }

    /// Return the id for `value`, registering it on first sight.
    pub fn intern(&mut self, value: StyleValue, prefix: StylePrefix) -> String {
        let key = Self::canonical_key(prefix, &value);
        if let Some(id) = self.lookup.get(&key) {
            *self.usage_count.entry(id.clone()).or_insert(0) += 1;
            return id.clone();
        }

        self.next_id += 1;
        let id = format!("{}_{:06X}", prefix.as_str(), self.next_id);
        self.styles.insert(id.clone(), value);
        self.lookup.insert(key, id.clone());
        self.usage_count.insert(id.clone(), 1);
        id
    }

    #[cfg(test)]
    pub fn usage(&self, id: &str) -> u32 {
        self.usage_count.get(id).copied().unwrap_or(0)
    }

    /// Inline every id with usage below [`INLINE_THRESHOLD`] across the tree
    /// and drop it from the table. The returned table only holds ids still
    /// referenced at least three times.
    pub fn finalize(mut self, nodes: &mut [SimplifiedNode]) -> GlobalVars {
        let inlined: Vec<String> = self
            .usage_count
            .iter()
            .filter(|(_, count)| **count < INLINE_THRESHOLD)
            .map(|(id, _)| id.clone())
            .collect();

        if !inlined.is_empty() {
            let styles = &self.styles;
            for node in nodes.iter_mut() {
                node.for_each_slot_mut(&mut |slot| {
                    if let StyleSlot::Id(id) = slot {
                        if inlined.contains(id) {
                            if let Some(value) = styles.get(id.as_str()) {
                                *slot = StyleSlot::Value(Box::new(value.clone()));
                            }
                        }
                    }
                });
            }
            for id in &inlined {
                self.styles.remove(id);
            }
        }

        GlobalVars {
            styles: self.styles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextStyle;

    fn text_style(family: &str) -> StyleValue {
        StyleValue::Text(TextStyle {
            font_family: Some(family.to_string()),
            font_weight: Some(400),
            font_size: Some(16.0),
            ..TextStyle::default()
        })
    }

    #[test]
    fn equal_values_share_one_id() {
        let mut interner = StyleInterner::new();
        let a = interner.intern(text_style("Inter"), StylePrefix::Text);
        let b = interner.intern(text_style("Inter"), StylePrefix::Text);
        let c = interner.intern(text_style("Roboto"), StylePrefix::Text);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.usage(&a), 2);
        assert_eq!(interner.usage(&c), 1);
    }

    #[test]
    fn ids_match_the_wire_format() {
        let mut interner = StyleInterner::new();
        let id = interner.intern(text_style("Inter"), StylePrefix::Text);
        let fill = interner.intern(
            StyleValue::Fills(vec![crate::types::Fill::Solid {
                hex: "#FFFFFF".to_string(),
                opacity: 1.0,
            }]),
            StylePrefix::Fill,
        );

        let check = |id: &str, prefix: &str| {
            let (head, tail) = id.split_at(prefix.len() + 1);
            assert_eq!(head, format!("{prefix}_"));
            assert_eq!(tail.len(), 6);
            assert!(tail
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        };
        check(&id, "style");
        check(&fill, "fill");
    }

    #[test]
    fn finalize_inlines_low_usage_ids() {
        let mut interner = StyleInterner::new();
        let rare = interner.intern(text_style("Inter"), StylePrefix::Text);
        let common = interner.intern(text_style("Roboto"), StylePrefix::Text);
        interner.intern(text_style("Roboto"), StylePrefix::Text);
        interner.intern(text_style("Roboto"), StylePrefix::Text);

        let mut nodes = vec![SimplifiedNode::new("1:1", "Text", "TEXT")];
        nodes[0].text_style = Some(StyleSlot::Id(rare.clone()));

        let global_vars = interner.finalize(&mut nodes);

        assert!(!global_vars.styles.contains_key(&rare));
        assert!(global_vars.styles.contains_key(&common));
        match nodes[0].text_style.as_ref().expect("slot") {
            StyleSlot::Value(value) => assert_eq!(**value, text_style("Inter")),
            StyleSlot::Id(id) => panic!("expected inlined literal, got id {id}"),
        }
    }

    #[test]
    fn finalize_leaves_no_dangling_references() {
        let mut interner = StyleInterner::new();
        let id = interner.intern(text_style("Inter"), StylePrefix::Text);
        interner.intern(text_style("Inter"), StylePrefix::Text);
        interner.intern(text_style("Inter"), StylePrefix::Text);

        let mut nodes = vec![SimplifiedNode::new("1:1", "Text", "TEXT")];
        nodes[0].text_style = Some(StyleSlot::Id(id.clone()));

        let global_vars = interner.finalize(&mut nodes);

        let mut dangling = 0;
        for node in &nodes {
            node.for_each_slot(&mut |slot| {
                if let StyleSlot::Id(id) = slot {
                    if !global_vars.styles.contains_key(id) {
                        dangling += 1;
                    }
                }
            });
        }
        assert_eq!(dangling, 0);
        assert!(global_vars.styles.contains_key(&id));
    }

    #[test]
    fn same_shape_under_different_prefixes_stays_distinct() {
        let mut interner = StyleInterner::new();
        let layout = StyleValue::Layout(crate::types::Layout::default());
        let a = interner.intern(layout.clone(), StylePrefix::Layout);
        let b = interner.intern(layout, StylePrefix::Effect);
        assert_ne!(a, b);
    }
}
