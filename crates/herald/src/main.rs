//! Herald - entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use herald::config::{ConfigLoader, HeraldConfig, DEFAULT_ENV_PREFIX};
use herald::{app, telemetry};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "herald", version, about = "Herald greeting service")]
struct Cli {
    /// Path to a configuration file (TOML or JSON).
    #[arg(short, long, env = "HERALD_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overriding the configuration.
    #[arg(long)]
    addr: Option<String>,
}

fn load_config(cli: &Cli) -> anyhow::Result<HeraldConfig> {
    let mut loader = ConfigLoader::new()
        .with_dotenv()
        .context("failed to read .env")?
        .with_env_prefix(DEFAULT_ENV_PREFIX);

    if let Some(path) = &cli.config {
        loader = loader
            .with_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
    }

    let mut config = loader.load().context("invalid configuration")?;
    if let Some(addr) = &cli.addr {
        config.server.http_addr.clone_from(addr);
        config.validate().context("invalid --addr")?;
    }
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    telemetry::init_telemetry(&app::telemetry_config(&config))
        .context("failed to initialize telemetry")?;

    tracing::info!(
        version = herald::VERSION,
        addr = %config.server.http_addr,
        "starting herald"
    );

    let server = app::build_server(&config).context("failed to assemble application")?;
    server.run().await.context("server error")?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("herald: {e:#}");
            ExitCode::FAILURE
        }
    }
}
