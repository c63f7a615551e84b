use anyhow::Result;
use clap::{Parser, Subcommand};

use sandcheck::config::Settings;

#[derive(Parser)]
#[command(
    name = "sandcheck",
    about = "Diagnostic check suite for cloud sandbox environments",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the check suite against the configured sandbox service
    Run {
        /// Run only the named check
        #[arg(long)]
        only: Option<String>,

        /// Override the service base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Override the target environment/region
        #[arg(long)]
        target: Option<String>,

        /// JSON report output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// List the registered checks in run order
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            only,
            base_url,
            target,
            json,
        } => {
            // Unresolved on purpose: a failed load aborts through the
            // suite journal inside run_suite.
            let settings = Settings::load().map(|mut s| {
                if let Some(url) = base_url {
                    s.base_url = url;
                }
                if let Some(target) = target {
                    s.target = Some(target);
                }
                s
            });

            let report = sandcheck::run_suite(settings, only.as_deref()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::List => {
            for name in sandcheck::checks::names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}
