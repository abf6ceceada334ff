//! Tree-level output types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::styles::{StyleSlot, StyleValue};

/// One node of the simplified tree. Style slots hold either an id into
/// [`GlobalVars::styles`] or an inlined literal; see [`StyleSlot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub component_properties: Vec<ComponentProperty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style: Option<StyleSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fills: Option<StyleSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strokes: Option<StyleSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<StyleSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<StyleSlot>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<SimplifiedNode>,
}

impl SimplifiedNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
            text: None,
            opacity: None,
            border_radius: None,
            component_id: None,
            component_properties: Vec::new(),
            text_style: None,
            fills: None,
            strokes: None,
            effects: None,
            layout: None,
            children: Vec::new(),
        }
    }

    /// Visit every style slot of this node, mutably.
    pub fn for_each_slot_mut(&mut self, f: &mut impl FnMut(&mut StyleSlot)) {
        for slot in [
            &mut self.text_style,
            &mut self.fills,
            &mut self.strokes,
            &mut self.effects,
            &mut self.layout,
        ]
        .into_iter()
        .flatten()
        {
            f(slot);
        }
        for child in &mut self.children {
            child.for_each_slot_mut(f);
        }
    }

    /// Visit every style slot of this node and its descendants.
    pub fn for_each_slot(&self, f: &mut impl FnMut(&StyleSlot)) {
        for slot in [
            &self.text_style,
            &self.fills,
            &self.strokes,
            &self.effects,
            &self.layout,
        ]
        .into_iter()
        .flatten()
        {
            f(slot);
        }
        for child in &self.children {
            child.for_each_slot(f);
        }
    }
}

/// One instance property, normalized into a name/value/type triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentProperty {
    pub name: String,
    pub value: String,
    #[serde(rename = "type")]
    pub property_type: String,
}

/// The shared style table. Lookup and usage bookkeeping live in the interner
/// and never reach the output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalVars {
    #[serde(default)]
    pub styles: BTreeMap<String, StyleValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSummary {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_set_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSetSummary {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The complete simplified design for one parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedDesign {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub nodes: Vec<SimplifiedNode>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub components: BTreeMap<String, ComponentSummary>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub component_sets: BTreeMap<String, ComponentSetSummary>,
    pub global_vars: GlobalVars,
}
