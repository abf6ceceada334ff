//! Transport-facing tool surface.
//!
//! Each tool declares a JSON-schema input and dispatches into the client and
//! engine. Errors never cross this boundary as `Err`: every outcome is a
//! [`ToolResult`], failed ones flagged with `is_error` and a single-line
//! message.

use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::analyze::analyze_response;
use crate::error::FcxError;
use crate::figma::client::{FigmaClient, RenderFormat, RenderOptions};
use crate::output::{render, OutputFormat};
use crate::types::{ComponentSetSummary, ComponentSummary, GlobalVars, SimplifiedDesign, SimplifiedNode};

pub const GET_FIGMA_DATA: &str = "get_figma_data";
pub const ANALYZE_FIGMA_DEPTH: &str = "analyze_figma_depth";
pub const DOWNLOAD_FIGMA_IMAGES: &str = "download_figma_images";

#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub is_error: bool,
    pub text: String,
}

impl ToolResult {
    fn ok(text: String) -> Self {
        Self {
            is_error: false,
            text,
        }
    }

    fn error(err: &FcxError) -> Self {
        Self {
            is_error: true,
            text: err.to_string(),
        }
    }
}

/// The payload shape for `get_figma_data`: metadata first, then nodes, then
/// the shared style table. The CLI `fetch` command emits the same shape.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaDataPayload {
    pub metadata: Metadata,
    pub nodes: Vec<SimplifiedNode>,
    pub global_vars: GlobalVars,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, ComponentSummary>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub component_sets: BTreeMap<String, ComponentSetSummary>,
}

impl FigmaDataPayload {
    pub fn from_design(design: SimplifiedDesign) -> Self {
        Self {
            metadata: Metadata {
                name: design.name,
                last_modified: design.last_modified,
                thumbnail_url: design.thumbnail_url,
                components: design.components,
                component_sets: design.component_sets,
            },
            nodes: design.nodes,
            global_vars: design.global_vars,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct GetFigmaDataParams {
    file_key: String,
    node_id: Option<String>,
    depth: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct AnalyzeDepthParams {
    file_key: String,
    node_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DownloadImagesParams {
    file_key: String,
    nodes: Vec<ImageNodeRequest>,
    local_path: String,
    png_scale: Option<f64>,
    svg_options: Option<SvgOptions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ImageNodeRequest {
    node_id: String,
    image_ref: Option<String>,
    file_name: String,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SvgOptions {
    #[serde(default)]
    include_id: bool,
    #[serde(default = "default_simplify_stroke")]
    simplify_stroke: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            include_id: false,
            simplify_stroke: true,
        }
    }
}

fn default_simplify_stroke() -> bool {
    true
}

pub struct ToolDispatcher {
    client: FigmaClient,
    output_format: OutputFormat,
}

impl ToolDispatcher {
    pub fn new(client: FigmaClient, output_format: OutputFormat) -> Self {
        Self {
            client,
            output_format,
        }
    }

    pub fn definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: GET_FIGMA_DATA,
                description: "Fetch a Figma file or node and return a simplified, LLM-friendly design tree",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "fileKey": {
                            "type": "string",
                            "description": "The Figma file key, from figma.com/(file|design)/<fileKey>/..."
                        },
                        "nodeId": {
                            "type": "string",
                            "description": "Optional node id (the node-id URL parameter) to fetch a subtree"
                        },
                        "depth": {
                            "type": "integer",
                            "description": "Optional maximum depth of the returned tree"
                        }
                    },
                    "required": ["fileKey"]
                }),
            },
            ToolDefinition {
                name: ANALYZE_FIGMA_DEPTH,
                description: "Analyze the depth distribution of a Figma document and recommend a depth limit",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "fileKey": {"type": "string"},
                        "nodeId": {"type": "string"}
                    },
                    "required": ["fileKey"]
                }),
            },
            ToolDefinition {
                name: DOWNLOAD_FIGMA_IMAGES,
                description: "Download image fills and rendered PNG/SVG exports for the given nodes",
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "fileKey": {"type": "string"},
                        "nodes": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "nodeId": {"type": "string"},
                                    "imageRef": {
                                        "type": "string",
                                        "description": "Present for image fills; omitted for render exports"
                                    },
                                    "fileName": {
                                        "type": "string",
                                        "description": "Target file name; extension selects png or svg rendering"
                                    }
                                },
                                "required": ["nodeId", "fileName"]
                            }
                        },
                        "localPath": {"type": "string"},
                        "pngScale": {"type": "number"},
                        "svgOptions": {
                            "type": "object",
                            "properties": {
                                "includeId": {"type": "boolean"},
                                "simplifyStroke": {"type": "boolean"}
                            }
                        }
                    },
                    "required": ["fileKey", "nodes", "localPath"]
                }),
            },
        ]
    }

    /// Run one tool call. Never returns `Err`; failures become error-flagged
    /// results.
    pub async fn dispatch(&self, name: &str, args: Value) -> ToolResult {
        let outcome = match name {
            GET_FIGMA_DATA => self.get_figma_data(args).await,
            ANALYZE_FIGMA_DEPTH => self.analyze_figma_depth(args).await,
            DOWNLOAD_FIGMA_IMAGES => self.download_figma_images(args).await,
            other => Err(FcxError::Config(format!("Unknown tool: {other}"))),
        };

        match outcome {
            Ok(text) => ToolResult::ok(text),
            Err(err) => ToolResult::error(&err),
        }
    }

    async fn get_figma_data(&self, args: Value) -> Result<String, FcxError> {
        let params: GetFigmaDataParams = parse_args(args)?;
        let design = match params.node_id.as_deref() {
            Some(node_id) => {
                self.client
                    .get_node(&params.file_key, node_id, params.depth)
                    .await?
            }
            None => self.client.get_file(&params.file_key, params.depth).await?,
        };

        render(&FigmaDataPayload::from_design(design), self.output_format)
    }

    async fn analyze_figma_depth(&self, args: Value) -> Result<String, FcxError> {
        let params: AnalyzeDepthParams = parse_args(args)?;
        let raw = self
            .client
            .get_raw_file(&params.file_key, params.node_id.as_deref(), None)
            .await?;
        Ok(analyze_response(&raw).format_report())
    }

    async fn download_figma_images(&self, args: Value) -> Result<String, FcxError> {
        let params: DownloadImagesParams = parse_args(args)?;
        let base = PathBuf::from(&params.local_path);

        let (fill_requests, render_requests): (Vec<_>, Vec<_>) = params
            .nodes
            .iter()
            .partition(|n| n.image_ref.is_some());

        let mut written: Vec<PathBuf> = Vec::new();

        if !fill_requests.is_empty() {
            let fill_urls = self.client.get_image_fill_urls(&params.file_key).await?;
            for request in &fill_requests {
                if let Some(url) = request
                    .image_ref
                    .as_deref()
                    .and_then(|image_ref| fill_urls.get(image_ref))
                {
                    written.push(
                        self.client
                            .download_to(url, &base.join(&request.file_name))
                            .await?,
                    );
                }
            }
        }

        for format in [RenderFormat::Png, RenderFormat::Svg] {
            let batch: Vec<&&ImageNodeRequest> = render_requests
                .iter()
                .filter(|n| extension_format(&n.file_name) == format)
                .collect();
            if batch.is_empty() {
                continue;
            }

            let svg = params.svg_options.unwrap_or_default();
            let options = RenderOptions {
                format,
                scale: params.png_scale.unwrap_or(2.0),
                svg_include_id: svg.include_id,
                svg_simplify_stroke: svg.simplify_stroke,
            };
            let ids: Vec<String> = batch.iter().map(|n| n.node_id.clone()).collect();
            let urls = self
                .client
                .get_render_urls(&params.file_key, &ids, options)
                .await?;

            for request in batch {
                if let Some(url) = urls.get(&request.node_id) {
                    written.push(
                        self.client
                            .download_to(url, &base.join(&request.file_name))
                            .await?,
                    );
                }
            }
        }

        Ok(written
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

fn parse_args<T: for<'de> Deserialize<'de>>(args: Value) -> Result<T, FcxError> {
    serde_json::from_value(args)
        .map_err(|e| FcxError::Config(format!("Invalid tool arguments: {e}")))
}

/// SVG file names render as SVG; everything else renders as PNG.
fn extension_format(file_name: &str) -> RenderFormat {
    match Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("svg") => RenderFormat::Svg,
        _ => RenderFormat::Png,
    }
}
