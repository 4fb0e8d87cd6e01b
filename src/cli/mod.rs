// src/cli/mod.rs — CLI definition (clap derive)

pub mod practice;
pub mod scenarios;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "interpersonal",
    about = "Rehearse difficult conversations against a simulated counterpart",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the relay API server
    Serve {
        /// Address to bind (overrides [server].host)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides [server].port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Start a timed practice session in the terminal
    Practice {
        /// Scenario id (see `interpersonal scenarios`)
        scenario: String,
        /// Model for the counterpart (gpt-4o-mini, gpt-3.5-turbo, gpt-4o, gpt-4-turbo)
        #[arg(short, long)]
        model: Option<String>,
        /// Use a running relay server instead of calling the model directly
        #[arg(long)]
        server: Option<String>,
        /// Session length in seconds
        #[arg(long)]
        duration: Option<u32>,
    },
    /// List the available scenarios
    Scenarios,
}
