//! PDF Echo CLI tool
//!
//! Serves the echo endpoint, or renders one example document in debug mode.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use pdf_echo::config::{ConfigOptions, RenderConfig};
use pdf_echo::echo::RequestEcho;
use pdf_echo::render::render;
use pdf_echo::server::serve;

/// PDF Echo - shows what a client sent, as a PDF
#[derive(Parser)]
#[command(name = "pdf-echo")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Serve on 0.0.0.0:8000
    pdf-echo

    # Render the built-in example request to a file
    pdf-echo --debug -o example.pdf

    # Post a request and decode the document
    curl -s -X POST localhost:8000 -d '{\"a\": 1}' | jq -r .document | base64 -d > echo.pdf")]
struct Cli {
    /// Render the example request to --output instead of serving
    #[arg(long)]
    debug: bool,

    /// Output file for debug mode
    #[arg(short, long, default_value = "example.pdf")]
    output: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Directory containing DejaVuSans.ttf, DejaVuSansMono.ttf and DejaVuSansMono-Bold.ttf
    #[arg(long, default_value = "fonts")]
    fonts_dir: PathBuf,

    /// Illustration shown in the intro block
    #[arg(long, default_value = "assets/illustration.png")]
    image: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = if cli.debug {
        cmd_debug(&cli)
    } else {
        cmd_serve(&cli)
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<RenderConfig> {
    let options = ConfigOptions {
        fonts_dir: cli.fonts_dir.clone(),
        image_path: cli.image.clone(),
        ..Default::default()
    };
    RenderConfig::load(&options).context("Failed to load render configuration")
}

/// Render the example request to a file
fn cmd_debug(cli: &Cli) -> anyhow::Result<()> {
    log::info!("Debug mode: rendering example document...");
    let config = load_config(cli)?;

    let pdf = render(&config, &RequestEcho::example()).context("Failed to render document")?;
    std::fs::write(&cli.output, &pdf)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    log::info!("Saved {} ({} bytes)", cli.output.display(), pdf.len());
    Ok(())
}

/// Start the HTTP endpoint
fn cmd_serve(cli: &Cli) -> anyhow::Result<()> {
    let config = Arc::new(load_config(cli)?);
    let addr = SocketAddr::new(cli.host, cli.port);

    log::info!("Starting echo service...");
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(serve(addr, config))?;
    Ok(())
}
