//! Simplified design model emitted by the graph simplifier.
//!
//! - [`design`] - tree-level types ([`SimplifiedDesign`], [`SimplifiedNode`], [`GlobalVars`])
//! - [`styles`] - CSS-flavored style values and the id-or-literal style slot

pub mod design;
pub mod styles;

pub use design::{
    ComponentProperty, ComponentSetSummary, ComponentSummary, GlobalVars, SimplifiedDesign,
    SimplifiedNode,
};
pub use styles::{
    Dimensions, Effects, Fill, GradientStop, Layout, LayoutMode, Point, Sizing, Stroke, StyleSlot,
    StyleValue, TextStyle,
};
