//! tontrace CLI: the `tontrace` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_logging(cli.verbose);

    match cli.command {
        Commands::Hash {
            message,
            discard_state_init,
            config,
            json,
        } => commands::hash::run(commands::hash::Args {
            message,
            discard_state_init,
            config,
            json,
        }),

        Commands::Decode { message, json } => commands::decode::run(message, json),

        Commands::Status {
            message,
            network,
            json,
        } => commands::status::run(message, network, json),

        Commands::Watch {
            message,
            network,
            interval_ms,
            max_polls,
            until_action,
            json,
        } => commands::watch::run(commands::watch::Args {
            message,
            network,
            interval_ms,
            max_polls,
            until_action,
            json,
        }),

        Commands::McpServe {
            network,
            server_name,
            server_version,
        } => commands::mcp_serve::run(commands::mcp_serve::Args {
            network,
            server_name,
            server_version,
        }),
    }
}
