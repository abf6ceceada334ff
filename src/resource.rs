//! Figma locator parsing: a full Figma URL or a bare file key.

use thiserror::Error;
use url::Url;

/// A resolved pointer into a Figma file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigmaLocator {
    pub file_key: String,
    pub node_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum LocatorParseError {
    #[error("Invalid URL '{value}': {message}. Hint: include http(s):// and ensure the URL is well-formed.")]
    InvalidUrl { value: String, message: String },
    #[error("Figma URL missing file key in '{url}'. Hint: use https://www.figma.com/design/<FILE_KEY>/... with node-id if needed.")]
    MissingFileKey { url: String },
    #[error("Empty file key")]
    EmptyFileKey,
}

/// Parse either a Figma URL (`…/file/<KEY>/…` or `…/design/<KEY>/…`) or a
/// bare file key. URL `node-id` query values are normalized `1-2` → `1:2`.
pub fn parse_locator(value: &str) -> Result<FigmaLocator, LocatorParseError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return parse_figma_url(value);
    }

    let key = value.trim();
    if key.is_empty() {
        return Err(LocatorParseError::EmptyFileKey);
    }
    Ok(FigmaLocator {
        file_key: key.to_string(),
        node_id: None,
    })
}

/// Normalize a node id given on the command line (`1-2` and `1:2` are both
/// accepted).
pub fn normalize_node_id(node_id: &str) -> String {
    node_id.replace('-', ":")
}

fn parse_figma_url(value: &str) -> Result<FigmaLocator, LocatorParseError> {
    let url = Url::parse(value).map_err(|e| LocatorParseError::InvalidUrl {
        value: value.to_string(),
        message: e.to_string(),
    })?;

    let path_segments: Vec<&str> = url.path_segments().map(|c| c.collect()).unwrap_or_default();

    let file_key = path_segments
        .iter()
        .position(|&s| s == "file" || s == "design")
        .and_then(|i| path_segments.get(i + 1))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| LocatorParseError::MissingFileKey {
            url: value.to_string(),
        })?;

    let node_id = url
        .query_pairs()
        .find(|(k, _)| k == "node-id")
        .map(|(_, v)| normalize_node_id(&v));

    Ok(FigmaLocator { file_key, node_id })
}
