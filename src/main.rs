// src/main.rs — Interpersonal entry point

use clap::Parser;

use interpersonal::api::{self, ApiState};
use interpersonal::cli::practice::{self, PracticeOptions};
use interpersonal::cli::{scenarios, Cli, Commands};
use interpersonal::infra::config::Config;
use interpersonal::infra::logger;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = ApiState::from_config(&config);
            api::start_server(&config.server, state).await
        }
        Commands::Practice {
            scenario,
            model,
            server,
            duration,
        } => {
            let options = PracticeOptions {
                scenario,
                model,
                server,
                duration,
            };
            practice::run_practice(options, &config).await
        }
        Commands::Scenarios => {
            scenarios::list_scenarios();
            Ok(())
        }
    }
}
