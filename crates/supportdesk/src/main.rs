// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supportdesk - AI customer support chat with ticket escalation.
//!
//! `serve` runs the HTTP service; `chat` and `tickets` talk to a running
//! server.

mod chat;
mod client;
mod serve;
mod shutdown;
mod tickets;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use supportdesk_config::SupportdeskConfig;
use supportdesk_core::SupportError;
use thiserror::Error;

use crate::client::{ApiClient, ClientError};

/// Supportdesk - AI customer support chat with ticket escalation.
#[derive(Parser, Debug)]
#[command(name = "supportdesk", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the server for `chat` and `tickets`.
    #[arg(long, global = true, value_name = "URL")]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP service.
    Serve,
    /// Chat with the support assistant.
    Chat,
    /// List, create, and update support tickets.
    Tickets {
        #[command(subcommand)]
        command: TicketCommands,
    },
}

#[derive(Subcommand, Debug)]
enum TicketCommands {
    /// Print every ticket, most recently updated first.
    List,
    /// Escalate a conversation into a ticket.
    Create {
        #[arg(long, default_value = tickets::DEFAULT_TITLE)]
        title: String,
        /// Customer name.
        #[arg(long)]
        name: String,
        /// Customer email.
        #[arg(long)]
        email: String,
        /// A user message; repeat for a multi-message conversation.
        #[arg(long = "message", required = true)]
        messages: Vec<String>,
    },
    /// Set a ticket's status (open, in_progress, resolved).
    Status { id: String, status: String },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Support(#[from] SupportError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => supportdesk_config::load_and_validate_path(path),
        None => supportdesk_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            supportdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let Some(command) = cli.command else {
        println!("supportdesk: use --help for available commands");
        return;
    };

    if let Err(e) = run(command, cli.server, config).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    server: Option<String>,
    config: SupportdeskConfig,
) -> Result<(), CliError> {
    match command {
        Commands::Serve => serve::run_serve(config).await?,
        Commands::Chat => chat::run_chat(&api_client(server, &config)?).await?,
        Commands::Tickets { command } => {
            let client = api_client(server, &config)?;
            match command {
                TicketCommands::List => tickets::run_list(&client).await?,
                TicketCommands::Create {
                    title,
                    name,
                    email,
                    messages,
                } => tickets::run_create(&client, &title, &name, &email, &messages).await?,
                TicketCommands::Status { id, status } => {
                    tickets::run_status(&client, &id, &status).await?
                }
            }
        }
    }
    Ok(())
}

fn api_client(server: Option<String>, config: &SupportdeskConfig) -> Result<ApiClient, ClientError> {
    let base_url = server.unwrap_or_else(|| config.server.base_url());
    ApiClient::new(&base_url, &config.retry)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_work_after_subcommands() {
        let cli = Cli::try_parse_from([
            "supportdesk",
            "tickets",
            "status",
            "t-1",
            "resolved",
            "--server",
            "http://localhost:4000",
        ])
        .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://localhost:4000"));
        assert!(matches!(
            cli.command,
            Some(Commands::Tickets {
                command: TicketCommands::Status { .. }
            })
        ));
    }

    #[test]
    fn create_requires_a_message() {
        let result = Cli::try_parse_from([
            "supportdesk",
            "tickets",
            "create",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn create_defaults_title() {
        let cli = Cli::try_parse_from([
            "supportdesk",
            "tickets",
            "create",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--message",
            "my app is down",
        ])
        .unwrap();
        let Some(Commands::Tickets {
            command: TicketCommands::Create { title, messages, .. },
        }) = cli.command
        else {
            panic!("expected tickets create");
        };
        assert_eq!(title, tickets::DEFAULT_TITLE);
        assert_eq!(messages, ["my app is down"]);
    }

    #[test]
    fn default_server_url_comes_from_config() {
        let config = supportdesk_config::load_and_validate_str("[server]\nport = 4100\n").unwrap();
        let client = api_client(None, &config).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:4100");
    }
}
