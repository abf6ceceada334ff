//! HTTP fetch with a curl fallback.
//!
//! Corporate proxies and TLS interception frequently break native clients in
//! ways the system curl tolerates, so a failed native GET is retried once
//! through `curl`. When both attempts fail, the caller sees the *native*
//! error, never the fallback's.

use reqwest::header::HeaderMap;
use serde_json::Value;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_TRANSFER_COMMAND: &str = "curl";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to spawn transfer tool: {0}")]
    Spawn(#[from] io::Error),

    #[error("transfer tool produced no usable output")]
    EmptyFallback,

    #[error("transfer tool reported a failure: {0}")]
    FallbackDiagnostic(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryingFetcher {
    http: reqwest::Client,
    transfer_command: String,
    timeout: Duration,
}

impl RetryingFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            transfer_command: DEFAULT_TRANSFER_COMMAND.to_string(),
            timeout,
        })
    }

    /// Override the fallback command (tests point this at stub binaries).
    pub fn with_transfer_command(mut self, command: impl Into<String>) -> Self {
        self.transfer_command = command.into();
        self
    }

    /// Authenticated GET returning parsed JSON. Falls back to the transfer
    /// tool on any native failure; if the fallback also fails, the native
    /// error is re-surfaced.
    pub async fn fetch_json(&self, url: &str, headers: &HeaderMap) -> Result<Value, FetchError> {
        let primary = match self.native_fetch(url, headers).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        match self.fallback_fetch(url, headers).await {
            Ok(value) => Ok(value),
            Err(_) => Err(primary),
        }
    }

    async fn native_fetch(&self, url: &str, headers: &HeaderMap) -> Result<Value, FetchError> {
        let response = self
            .http
            .get(url)
            .headers(headers.clone())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn fallback_fetch(&self, url: &str, headers: &HeaderMap) -> Result<Value, FetchError> {
        let mut cmd = Command::new(&self.transfer_command);
        cmd.args(transfer_args(url, headers))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;

        parse_transfer_output(&output.stdout, &output.stderr)
    }
}

/// Arguments for the transfer tool: silent-show-error, follow redirects,
/// fail on non-2xx bodies, plus one `-H` per header.
fn transfer_args(url: &str, headers: &HeaderMap) -> Vec<String> {
    let mut args = vec![
        "-sS".to_string(),
        "-L".to_string(),
        "--fail".to_string(),
    ];
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            args.push("-H".to_string());
            args.push(format!("{name}: {value}"));
        }
    }
    args.push(url.to_string());
    args
}

/// Interpret the transfer tool's output. Empty stdout, or a diagnostic
/// stream mentioning an error, counts as a fallback failure.
fn parse_transfer_output(stdout: &[u8], stderr: &[u8]) -> Result<Value, FetchError> {
    let diagnostics = String::from_utf8_lossy(stderr);
    let lower = diagnostics.to_ascii_lowercase();
    if !diagnostics.trim().is_empty() && (lower.contains("error") || lower.contains("fail")) {
        return Err(FetchError::FallbackDiagnostic(
            diagnostics.trim().to_string(),
        ));
    }

    let body = String::from_utf8_lossy(stdout);
    if body.trim().is_empty() {
        return Err(FetchError::EmptyFallback);
    }

    Ok(serde_json::from_str(body.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    #[test]
    fn transfer_args_follow_redirects_and_fail_on_http_errors() {
        let mut headers = HeaderMap::new();
        headers.insert("x-figma-token", HeaderValue::from_static("secret"));

        let args = transfer_args("https://api.figma.com/v1/files/abc", &headers);

        assert_eq!(args[0], "-sS");
        assert!(args.contains(&"-L".to_string()));
        assert!(args.contains(&"--fail".to_string()));
        assert!(args.contains(&"x-figma-token: secret".to_string()));
        assert_eq!(args.last().unwrap(), "https://api.figma.com/v1/files/abc");
    }

    #[test]
    fn transfer_output_with_json_body_parses() {
        let value = parse_transfer_output(br#"{"name": "Design"}"#, b"").expect("parsed");
        assert_eq!(value["name"], "Design");
    }

    #[test]
    fn empty_stdout_is_a_fallback_failure() {
        let result = parse_transfer_output(b"", b"");
        assert!(matches!(result, Err(FetchError::EmptyFallback)));
    }

    #[test]
    fn diagnostic_stream_mentioning_error_is_a_fallback_failure() {
        let result = parse_transfer_output(br#"{"ok": true}"#, b"curl: (6) Could not resolve host: ERROR");
        assert!(matches!(result, Err(FetchError::FallbackDiagnostic(_))));

        let result = parse_transfer_output(br#"{"ok": true}"#, b"transfer FAILED midway");
        assert!(matches!(result, Err(FetchError::FallbackDiagnostic(_))));
    }

    #[test]
    fn benign_diagnostics_do_not_mask_a_valid_body() {
        let value = parse_transfer_output(br#"{"ok": true}"#, b"  % Total    % Received")
            .expect("benign stderr tolerated");
        assert_eq!(value["ok"], true);
    }

    #[cfg(unix)]
    mod fallback_integration {
        use super::super::*;
        use reqwest::header::HeaderMap;
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        fn stub_command(dir: &tempfile::TempDir, body: &str) -> String {
            let path = dir.path().join("transfer-stub.sh");
            let mut file = std::fs::File::create(&path).expect("create stub");
            writeln!(file, "#!/bin/sh").unwrap();
            writeln!(file, "{body}").unwrap();
            drop(file);
            let mut perms = std::fs::metadata(&path).expect("stat").permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).expect("chmod");
            path.to_string_lossy().into_owned()
        }

        #[tokio::test]
        async fn fallback_body_is_returned_when_native_fetch_fails() {
            let dir = tempfile::tempdir().expect("tempdir");
            let stub = stub_command(&dir, r#"printf '{"name": "Recovered"}'"#);

            let fetcher = RetryingFetcher::new()
                .expect("fetcher")
                .with_transfer_command(stub);

            // Nothing listens on this port; the native client fails fast.
            let value = fetcher
                .fetch_json("http://127.0.0.1:9/unreachable", &HeaderMap::new())
                .await
                .expect("fallback succeeds");
            assert_eq!(value["name"], "Recovered");
        }

        #[tokio::test]
        async fn original_error_resurfaces_when_fallback_is_empty() {
            let dir = tempfile::tempdir().expect("tempdir");
            let stub = stub_command(&dir, "exit 0");

            let fetcher = RetryingFetcher::new()
                .expect("fetcher")
                .with_transfer_command(stub);

            let result = fetcher
                .fetch_json("http://127.0.0.1:9/unreachable", &HeaderMap::new())
                .await;

            assert!(
                matches!(result, Err(FetchError::Network(_))),
                "the native error must win, got {result:?}"
            );
        }
    }
}
