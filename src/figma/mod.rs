//! Figma REST API integration.
//!
//! - [`client::FigmaClient`] - endpoint construction, auth headers, fetches
//! - [`api_types`] - raw (schema-flexible) response types

pub mod api_types;
pub mod client;

pub use api_types::{RawFileResponse, RawNode, RawNodesResponse, RawResponse};
pub use client::{FigmaAuth, FigmaClient, RenderFormat, RenderOptions};
