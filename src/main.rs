mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cli::Commands;
use fcx_lib::figma::client::{RenderFormat, RenderOptions};
use fcx_lib::{
    analyze_response, normalize_node_id, parse_locator, render, render_raw, Config, FcxError,
    FigmaAuth, FigmaClient, FigmaDataPayload, OutputFormat, SimplifiedNode,
};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let args = cli::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => return render_error(err),
    };

    let auth = match resolve_auth(args.api_key.as_deref(), args.oauth_token.as_deref()) {
        Ok(auth) => auth,
        Err(err) => return render_error(err),
    };

    let client = match FigmaClient::with_base_url(auth, config.base_url.clone()) {
        Ok(client) => client,
        Err(err) => return render_error(err),
    };

    match args.command {
        Commands::Fetch {
            target,
            node_id,
            depth,
            raw,
            format,
            output,
        } => {
            let locator = match parse_locator(&target) {
                Ok(locator) => locator,
                Err(err) => return render_error(FcxError::Config(err.to_string())),
            };
            let node_id = node_id
                .as_deref()
                .map(normalize_node_id)
                .or(locator.node_id);
            let format = format.unwrap_or(config.output_format);

            if args.verbose {
                eprintln!(
                    "Fetching {} (node: {}, depth: {})…",
                    locator.file_key,
                    node_id.as_deref().unwrap_or("-"),
                    depth.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
                );
            }

            let text = if raw {
                let value = match client
                    .get_raw_json(&locator.file_key, node_id.as_deref(), depth)
                    .await
                {
                    Ok(value) => value,
                    Err(err) => return render_error(err),
                };
                match render_raw(&value, format) {
                    Ok(text) => text,
                    Err(err) => return render_error(err),
                }
            } else {
                let design = match node_id.as_deref() {
                    Some(id) => client.get_node(&locator.file_key, id, depth).await,
                    None => client.get_file(&locator.file_key, depth).await,
                };
                let design = match design {
                    Ok(design) => design,
                    Err(err) => return render_error(err),
                };

                if args.verbose {
                    print_summary(&design.nodes, design.global_vars.styles.len());
                }

                match render(&FigmaDataPayload::from_design(design), format) {
                    Ok(text) => text,
                    Err(err) => return render_error(err),
                }
            };

            if let Err(err) = write_output(&text, output.as_deref()) {
                return render_error(err);
            }
            ExitCode::SUCCESS
        }
        Commands::Analyze { target, node_id } => {
            let locator = match parse_locator(&target) {
                Ok(locator) => locator,
                Err(err) => return render_error(FcxError::Config(err.to_string())),
            };
            let node_id = node_id
                .as_deref()
                .map(normalize_node_id)
                .or(locator.node_id);

            let raw = match client
                .get_raw_file(&locator.file_key, node_id.as_deref(), None)
                .await
            {
                Ok(raw) => raw,
                Err(err) => return render_error(err),
            };

            print!("{}", analyze_response(&raw).format_report());
            ExitCode::SUCCESS
        }
        Commands::Images {
            target,
            node_ids,
            path,
            png_scale,
            svg,
        } => {
            let locator = match parse_locator(&target) {
                Ok(locator) => locator,
                Err(err) => return render_error(FcxError::Config(err.to_string())),
            };
            let ids: Vec<String> = node_ids.iter().map(|id| normalize_node_id(id)).collect();

            let options = RenderOptions {
                format: if svg { RenderFormat::Svg } else { RenderFormat::Png },
                scale: png_scale,
                ..RenderOptions::default()
            };

            let written = match download_renders(&client, &locator.file_key, &ids, &path, options)
                .await
            {
                Ok(paths) => paths,
                Err(err) => return render_error(err),
            };

            for path in &written {
                println!("{}", path.display());
            }
            if args.verbose {
                eprintln!("Downloaded {} image(s) to {}", written.len(), path.display());
            }
            ExitCode::SUCCESS
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, FcxError> {
    let config = match path {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    config.validate().map_err(FcxError::Config)?;
    Ok(config)
}

/// Exactly one credential is active per client; flags beat the environment.
fn resolve_auth(api_key: Option<&str>, oauth_token: Option<&str>) -> Result<FigmaAuth, FcxError> {
    if let Some(token) = api_key.filter(|t| !t.is_empty()) {
        return Ok(FigmaAuth::PersonalAccessToken(token.to_string()));
    }
    if let Some(token) = oauth_token.filter(|t| !t.is_empty()) {
        return Ok(FigmaAuth::OAuthToken(token.to_string()));
    }
    FigmaAuth::from_env().ok_or(FcxError::AuthMissing)
}

async fn download_renders(
    client: &FigmaClient,
    file_key: &str,
    node_ids: &[String],
    dir: &Path,
    options: RenderOptions,
) -> Result<Vec<PathBuf>, FcxError> {
    let urls = client.get_render_urls(file_key, node_ids, options).await?;
    let extension = options.format.as_str();

    let mut written = Vec::new();
    for node_id in node_ids {
        if let Some(url) = urls.get(node_id) {
            let file_name = format!("{}.{}", node_id.replace(':', "-"), extension);
            written.push(client.download_to(url, &dir.join(file_name)).await?);
        }
    }
    Ok(written)
}

fn print_summary(nodes: &[SimplifiedNode], style_count: usize) {
    fn count(nodes: &[SimplifiedNode], total: &mut usize, summaries: &mut usize) {
        for node in nodes {
            *total += 1;
            if node.node_type == "SUMMARY" {
                *summaries += 1;
            }
            count(&node.children, total, summaries);
        }
    }

    let (mut total, mut summaries) = (0, 0);
    count(nodes, &mut total, &mut summaries);
    eprintln!("Simplified {total} node(s), {style_count} shared style(s)");
    if summaries > 0 {
        eprintln!("Collapsed repetitive content behind {summaries} summary node(s)");
    }
}

fn write_output(text: &str, output: Option<&Path>) -> Result<(), FcxError> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)?;
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn render_error(err: FcxError) -> ExitCode {
    let payload = err.to_payload();
    eprintln!("Error: {}", payload.message);
    if let Some(remediation) = payload.remediation {
        eprintln!("Hint: {remediation}");
    }
    ExitCode::from(2)
}
