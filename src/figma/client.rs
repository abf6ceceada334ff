//! Figma API client: builds endpoint URLs, attaches the auth header, and
//! hands raw responses to the simplifier.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{FcxError, Result};
use crate::fetch::{FetchError, RetryingFetcher};
use crate::simplify::parse_response;
use crate::types::SimplifiedDesign;

use super::api_types::RawResponse;

const DEFAULT_BASE_URL: &str = "https://api.figma.com";

/// Requested depths are widened by this buffer at the wire so wrapper
/// elision can still inspect one extra layer, capped by the API maximum.
const DEPTH_BUFFER: usize = 2;
const MAX_WIRE_DEPTH: usize = 10;

#[derive(Debug, Clone)]
pub enum FigmaAuth {
    PersonalAccessToken(String),
    OAuthToken(String),
}

impl FigmaAuth {
    pub fn from_env() -> Option<Self> {
        for key in ["FIGMA_API_KEY", "FIGMA_TOKEN"] {
            if let Ok(token) = std::env::var(key) {
                if !token.is_empty() {
                    return Some(Self::PersonalAccessToken(token));
                }
            }
        }

        if let Ok(token) = std::env::var("FIGMA_OAUTH_TOKEN") {
            if !token.is_empty() {
                return Some(Self::OAuthToken(token));
            }
        }

        None
    }

    fn header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        match self {
            FigmaAuth::PersonalAccessToken(token) => {
                headers.insert(
                    "X-Figma-Token",
                    HeaderValue::from_str(token).map_err(|_| FcxError::AuthMissing)?,
                );
            }
            FigmaAuth::OAuthToken(token) => {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {token}"))
                        .map_err(|_| FcxError::AuthMissing)?,
                );
            }
        }
        Ok(headers)
    }
}

/// PNG/SVG render-request options for the images endpoint.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: RenderFormat,
    pub scale: f64,
    pub svg_include_id: bool,
    pub svg_simplify_stroke: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: RenderFormat::Png,
            scale: 2.0,
            svg_include_id: false,
            svg_simplify_stroke: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    Png,
    Svg,
}

impl RenderFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderFormat::Png => "png",
            RenderFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FigmaClient {
    fetcher: RetryingFetcher,
    http: reqwest::Client,
    headers: HeaderMap,
    base_url: String,
}

impl FigmaClient {
    pub fn new(auth: FigmaAuth) -> Result<Self> {
        Self::with_base_url(auth, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(auth: FigmaAuth, base_url: impl Into<String>) -> Result<Self> {
        let fetcher = RetryingFetcher::new().map_err(map_fetch_error)?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            fetcher,
            http,
            headers: auth.header_map()?,
            base_url: base_url.into(),
        })
    }

    /// Simplified full file.
    pub async fn get_file(&self, file_key: &str, depth: Option<usize>) -> Result<SimplifiedDesign> {
        let raw = self.get_raw_file(file_key, None, depth).await?;
        Ok(parse_response(&raw, depth))
    }

    /// Simplified single-node tree.
    pub async fn get_node(
        &self,
        file_key: &str,
        node_id: &str,
        depth: Option<usize>,
    ) -> Result<SimplifiedDesign> {
        let raw = self.get_raw_file(file_key, Some(node_id), depth).await?;
        Ok(parse_response(&raw, depth))
    }

    /// Raw response, typed. Used by the depth analyzer and as the input to
    /// [`parse_response`].
    pub async fn get_raw_file(
        &self,
        file_key: &str,
        node_id: Option<&str>,
        depth: Option<usize>,
    ) -> Result<RawResponse> {
        let value = self.get_raw_json(file_key, node_id, depth).await?;
        serde_json::from_value(value)
            .map_err(|e| FcxError::Malformed(format!("unexpected response shape: {e}")))
    }

    /// Raw response as untyped JSON (the CLI `--raw` path).
    pub async fn get_raw_json(
        &self,
        file_key: &str,
        node_id: Option<&str>,
        depth: Option<usize>,
    ) -> Result<Value> {
        let url = file_url(&self.base_url, file_key, node_id, depth);
        self.fetch(&url).await
    }

    /// Image-fill download URLs for a file, keyed by `imageRef`.
    pub async fn get_image_fill_urls(&self, file_key: &str) -> Result<HashMap<String, String>> {
        let url = format!("{}/v1/files/{}/images", self.base_url, file_key);
        let value = self.fetch(&url).await?;
        let mut urls = HashMap::new();
        if let Some(images) = value
            .get("meta")
            .and_then(|m| m.get("images"))
            .and_then(Value::as_object)
        {
            for (image_ref, url) in images {
                if let Some(url) = url.as_str() {
                    urls.insert(image_ref.clone(), url.to_string());
                }
            }
        }
        Ok(urls)
    }

    /// Render-export URLs for the given node ids, keyed by node id. Nodes
    /// the API could not render map to null upstream and are skipped.
    pub async fn get_render_urls(
        &self,
        file_key: &str,
        node_ids: &[String],
        options: RenderOptions,
    ) -> Result<HashMap<String, String>> {
        if node_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = render_url(&self.base_url, file_key, node_ids, options);
        let value = self.fetch(&url).await?;

        if let Some(err) = value.get("err").and_then(Value::as_str) {
            return Err(FcxError::upstream(None, err.to_string()));
        }

        let mut urls = HashMap::new();
        if let Some(images) = value.get("images").and_then(Value::as_object) {
            for (node_id, url) in images {
                if let Some(url) = url.as_str() {
                    urls.insert(node_id.clone(), url.to_string());
                }
            }
        }
        Ok(urls)
    }

    /// Download one rendered/image URL to `path`. Parent directories are
    /// created; the written path is returned.
    pub async fn download_to(&self, url: &str, path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FcxError::upstream(
                Some(status),
                format!("failed to download {url}"),
            ));
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(path, &bytes).await?;
        Ok(path.to_path_buf())
    }

    async fn fetch(&self, url: &str) -> Result<Value> {
        self.fetcher
            .fetch_json(url, &self.headers)
            .await
            .map_err(map_fetch_error)
    }

    #[cfg(test)]
    pub(crate) fn auth_headers(&self) -> &HeaderMap {
        &self.headers
    }
}

fn map_fetch_error(err: FetchError) -> FcxError {
    match err {
        FetchError::Status { status, message } => FcxError::Upstream {
            status: reqwest::StatusCode::from_u16(status).ok(),
            message,
        },
        FetchError::Decode(e) => FcxError::Malformed(e.to_string()),
        other => FcxError::Transport {
            message: other.to_string(),
        },
    }
}

/// Depth requested by the caller, widened for the wire.
fn wire_depth(depth: usize) -> usize {
    (depth + DEPTH_BUFFER).min(MAX_WIRE_DEPTH)
}

fn file_url(
    base_url: &str,
    file_key: &str,
    node_id: Option<&str>,
    depth: Option<usize>,
) -> String {
    let mut url = match node_id {
        Some(id) => format!("{base_url}/v1/files/{file_key}/nodes?ids={id}"),
        None => format!("{base_url}/v1/files/{file_key}"),
    };

    if let Some(depth) = depth {
        let separator = if node_id.is_some() { '&' } else { '?' };
        url.push(separator);
        url.push_str(&format!("depth={}", wire_depth(depth)));
    }

    url
}

fn render_url(
    base_url: &str,
    file_key: &str,
    node_ids: &[String],
    options: RenderOptions,
) -> String {
    let ids = node_ids.join(",");
    let mut url = format!(
        "{}/v1/images/{}?ids={}&format={}",
        base_url,
        file_key,
        ids,
        options.format.as_str()
    );
    match options.format {
        RenderFormat::Png => {
            url.push_str(&format!("&scale={}", options.scale));
        }
        RenderFormat::Svg => {
            url.push_str(&format!(
                "&svg_include_id={}&svg_simplify_stroke={}",
                options.svg_include_id, options.svg_simplify_stroke
            ));
        }
    }
    url
}
