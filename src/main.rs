use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use imaging_demo::app::App;
use imaging_demo::config::Config;
use imaging_demo::products::Product;
use imaging_demo::{logging, rest};

#[derive(Parser)]
#[command(name = "imaging-demo")]
#[command(about = "Guided demo of the imaging decision-support products")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the product line
    Products,

    /// Show the configured demo steps
    Steps,

    /// Write the effective configuration to .imaging-demo/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Start the REST API server hosting demo sessions
    Api {
        /// Port to listen on (default: 7108)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    // No subcommand means the terminal demo owns the screen
    let is_tui_mode = cli.command.is_none();

    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Products) => cmd_products(),
        Some(Commands::Steps) => cmd_steps(&config)?,
        Some(Commands::Init { force }) => cmd_init(&config, force)?,
        Some(Commands::Api { port }) => cmd_api(&config, port).await?,
        None => run_tui(config, logging_handle.log_file_path)?,
    }

    Ok(())
}

fn run_tui(config: Config, log_file_path: Option<PathBuf>) -> Result<()> {
    let mut app = App::new(config)?;
    let result = app.run();

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn cmd_products() {
    println!("Products");
    println!("{}", "─".repeat(60));
    for product in Product::all() {
        let demo = if product.has_demo_wizard() {
            "demo"
        } else {
            "    "
        };
        println!(
            "{:<10} {} {:<12} {}",
            product.key(),
            demo,
            product.route(),
            product.tagline()
        );
    }
}

fn cmd_steps(config: &Config) -> Result<()> {
    let steps = config.wizard_steps()?;

    println!("{} demo ({} steps)", config.wizard.product.label(), steps.len());
    println!("{}", "─".repeat(60));
    for (index, step) in steps.iter().enumerate() {
        let badge = if step.is_new { " [NEW]" } else { "" };
        println!("{:>2}. {}{}", index + 1, step.name, badge);
    }

    Ok(())
}

fn cmd_init(config: &Config, force: bool) -> Result<()> {
    let path = Config::local_config_path();
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    config.save()?;
    tracing::info!(path = %path.display(), "Wrote config");
    println!("Wrote {}", path.display());

    Ok(())
}

async fn cmd_api(config: &Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.rest_api.port);

    println!("Starting REST API server...");
    println!("  Port: {}", port);
    println!("  Endpoints:");
    println!("    GET    /api/v1/health                        Health check");
    println!("    GET    /api/v1/status                        Server status");
    println!("    GET    /api/v1/products                      List products");
    println!("    GET    /api/v1/steps                         List demo steps");
    println!("    POST   /api/v1/sessions                      Start a session");
    println!("    GET    /api/v1/sessions/:id                  Session snapshot");
    println!("    DELETE /api/v1/sessions/:id                  End a session");
    println!("    POST   /api/v1/sessions/:id/complete/:step   Complete a step");
    println!("    POST   /api/v1/sessions/:id/next             Next step");
    println!("    POST   /api/v1/sessions/:id/previous         Previous step");
    println!("    POST   /api/v1/sessions/:id/goto/:step       Jump to a step");
    println!("    POST   /api/v1/sessions/:id/reset            Restart the demo");
    println!();

    let state = rest::ApiState::new(config.clone())?;
    rest::serve(state, port).await?;

    Ok(())
}
