//! Figma context extractor (fcx) library
//!
//! Fetches Figma files over the REST API and simplifies the deeply nested
//! node graph into a compact, CSS-flavored design tree for consumption by
//! LLM coding agents.
//!
//! # Module Overview
//!
//! - [`figma`] - REST client and raw response types
//! - [`fetch`] - native HTTP GET with a curl fallback
//! - [`simplify`] - the design-graph simplification engine
//! - [`transform`] - layout/paint/stroke/effect/text translators
//! - [`analyze`] - depth-distribution analysis and recommendations
//! - [`tools`] - the externally callable tool surface
//! - [`types`] - simplified design model
//! - [`output`] - YAML/JSON rendering
//!
//! # Example
//!
//! ```no_run
//! use fcx_lib::{FigmaAuth, FigmaClient};
//!
//! # async fn example() -> fcx_lib::Result<()> {
//! let auth = FigmaAuth::from_env().expect("FIGMA_API_KEY set");
//! let client = FigmaClient::new(auth)?;
//! let design = client.get_node("FILE_KEY", "1:2", Some(4)).await?;
//! println!("{} top-level node(s)", design.nodes.len());
//! # Ok(())
//! # }
//! ```

pub mod analyze;
pub mod config;
pub mod error;
pub mod fetch;
pub mod figma;
pub mod output;
pub mod resource;
pub mod simplify;
pub mod tools;
pub mod transform;
pub mod types;

pub use analyze::{analyze_response, analyze_tree, DepthStats};
pub use config::Config;
pub use error::{ErrorCategory, ErrorPayload, FcxError, Result};
pub use fetch::{FetchError, RetryingFetcher};
pub use figma::{FigmaAuth, FigmaClient, RawNode, RawResponse};
pub use output::{remove_empty_keys, render, render_raw, OutputFormat};
pub use resource::{normalize_node_id, parse_locator, FigmaLocator};
pub use simplify::parse_response;
pub use tools::{FigmaDataPayload, ToolDefinition, ToolDispatcher, ToolResult};
pub use types::{
    GlobalVars, SimplifiedDesign, SimplifiedNode, StyleSlot, StyleValue,
};
