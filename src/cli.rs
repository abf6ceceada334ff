use clap::{Parser, Subcommand};
use fcx_lib::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fcx")]
#[command(
    version,
    about = "Figma context extractor - fetch Figma files as compact, LLM-friendly design trees",
    long_about = "Figma context extractor (fcx)\n\nModes:\n- fetch: download a file or node and emit the simplified design tree (YAML by default).\n- analyze: report the depth distribution of a document and recommend a depth limit.\n- images: download image fills and rendered PNG/SVG exports for specific nodes.\n\nAuthentication comes from --api-key/--oauth-token or the FIGMA_API_KEY / FIGMA_TOKEN / FIGMA_OAUTH_TOKEN environment variables."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output on stderr")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "TOKEN",
        help = "Figma personal access token (overrides FIGMA_API_KEY/FIGMA_TOKEN)"
    )]
    pub api_key: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "TOKEN",
        help = "Figma OAuth bearer token (overrides FIGMA_OAUTH_TOKEN)"
    )]
    pub oauth_token: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) to set defaults for output format and timeouts; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a file or node and emit the simplified design tree
    Fetch {
        #[arg(help = "Figma URL or bare file key")]
        target: String,

        #[arg(long, help = "Node id to fetch a subtree (1-2 and 1:2 both accepted)")]
        node_id: Option<String>,

        #[arg(long, help = "Maximum depth of the emitted tree")]
        depth: Option<usize>,

        #[arg(long, help = "Emit the raw API response without simplification")]
        raw: bool,

        #[arg(long, value_enum, help = "Output format (default from config; yaml otherwise)")]
        format: Option<OutputFormat>,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Analyze depth distribution and recommend a depth limit
    Analyze {
        #[arg(help = "Figma URL or bare file key")]
        target: String,

        #[arg(long, help = "Node id to analyze a subtree")]
        node_id: Option<String>,
    },

    /// Download rendered exports for specific nodes
    Images {
        #[arg(help = "Figma URL or bare file key")]
        target: String,

        #[arg(long = "node-id", required = true, help = "Node id to render (repeatable)")]
        node_ids: Vec<String>,

        #[arg(long, default_value = "./figma-images", help = "Directory to write images into")]
        path: PathBuf,

        #[arg(long, default_value = "2.0", help = "Export scale for PNG rendering")]
        png_scale: f64,

        #[arg(long, help = "Render SVG instead of PNG")]
        svg: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
