//! Compile asset catalogs with `actool`, failing on any warning.
//!
//! Exits with status 1 on every failure; diagnostics go to stderr and nothing is written to
//! stdout on success.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use compile_xcassets::{CatalogCompiler, CompileRequest, Platform, TargetEnvironment, ToolConfig};

#[derive(Parser, Debug)]
#[command(name = "compile_xcassets", version)]
#[command(about = "compile assets catalog for a bundle")]
struct Cli {
    /// Target platform for the compiled assets catalog.
    #[arg(short = 'p', long, value_enum)]
    platform: Platform,

    /// Target environment for the compiled assets catalog.
    #[arg(short = 'e', long, value_enum)]
    target_environment: Option<TargetEnvironment>,

    /// Minimum deployment target for the compiled assets catalog.
    #[arg(short = 't', long)]
    minimum_deployment_target: String,

    /// Path to the compiled assets catalog.
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Recompress PNGs while compiling assets catalog.
    #[arg(short = 'c', long)]
    compress_pngs: bool,

    /// Type of the containing bundle.
    #[arg(short = 'T', long)]
    product_type: Option<String>,

    /// Path to partial info plist to create.
    #[arg(short = 'P', long)]
    partial_info_plist: Option<PathBuf>,

    /// JSON file describing how to launch actool.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to input assets catalog sources.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

impl Cli {
    fn tool_config(&self) -> Result<ToolConfig> {
        match &self.config {
            Some(path) => ToolConfig::from_path(path),
            None => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                Ok(ToolConfig::discover(&cwd))
            }
        }
    }

    fn into_request(self) -> CompileRequest {
        CompileRequest {
            output: self.output,
            platform: self.platform,
            target_environment: self.target_environment,
            minimum_deployment_target: self.minimum_deployment_target,
            product_type: self.product_type,
            compress_pngs: self.compress_pngs,
            partial_info_plist: self.partial_info_plist,
            inputs: self.inputs,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.tool_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    let request = cli.into_request();
    match CatalogCompiler::new(config).compile(&request) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.diagnostic_text() {
                Some(text) => eprint!("{text}"),
                None => eprintln!("{err}"),
            }
            ExitCode::FAILURE
        }
    }
}
