use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum FcxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Figma API error (status: {status:?}): {message}")]
    Upstream {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Transport failure: {message}")]
    Transport { message: String },

    #[error("Missing Figma credential; set FIGMA_API_KEY (or FIGMA_TOKEN) or FIGMA_OAUTH_TOKEN")]
    AuthMissing,

    #[error("Malformed Figma response: {0}")]
    Malformed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FcxError {
    pub fn upstream(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        FcxError::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            FcxError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            FcxError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            FcxError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify the URL format (e.g., https://www.figma.com/design/<FILE_KEY>/...).",
            ),
            FcxError::Upstream { status, message } => ErrorPayload::new(
                ErrorCategory::Figma,
                format!("Figma API error (status {:?}): {}", status, message),
                "Check the file key, node id, and token scopes; retry after rate limits expire.",
            ),
            FcxError::Transport { message } => ErrorPayload::new(
                ErrorCategory::Network,
                message.clone(),
                "Both the native client and the curl fallback failed; check connectivity and any corporate proxy.",
            ),
            FcxError::AuthMissing => ErrorPayload::new(
                ErrorCategory::Config,
                self.to_string(),
                "Set FIGMA_API_KEY (or FIGMA_TOKEN) for a personal access token, or FIGMA_OAUTH_TOKEN for OAuth.",
            ),
            FcxError::Malformed(msg) => ErrorPayload::new(
                ErrorCategory::Figma,
                msg.clone(),
                "The upstream body was not the expected shape; retry, or fetch with --raw to inspect it.",
            ),
            FcxError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check JSON inputs; run with --verbose for details.",
            ),
            FcxError::Yaml(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "YAML rendering failed; try --format json.",
            ),
            FcxError::Config(msg) => ErrorPayload::new(
                ErrorCategory::Config,
                msg.clone(),
                "Check flags/paths and required tokens.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, FcxError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Figma,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
