//! Bookshelf command-line entrypoint.

use anyhow::Context;
use bookshelf_client::HttpBooksApi;
use bookshelf_kernel::settings::{LogFormat, Settings};
use clap::Parser;

mod cli;
mod commands;

use crate::cli::{BooksCommand, Cli, Command, LogFormatArg};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::load().context("failed to load bookshelf settings")?;
    apply_overrides(&cli, &mut settings);
    bookshelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => {
            tracing::info!(
                env = ?settings.environment,
                db = %settings.database.url,
                "bookshelf server starting"
            );
            commands::run_serve(&settings).await
        }
        Command::Openapi => commands::run_openapi().await,
        Command::Genres => commands::run_genres(),
        Command::Books { command } => {
            let api = HttpBooksApi::new(settings.client.api_base_url.as_str());
            let page_size = settings.client.page_size;
            tracing::debug!(api = %settings.client.api_base_url, "using books api");

            match command {
                BooksCommand::List(args) => commands::run_list(api, page_size, &args).await,
                BooksCommand::Show { id } => commands::run_show(api, id).await,
                BooksCommand::Create(args) => commands::run_create(api, page_size, &args).await,
                BooksCommand::Replace { id, fields } => {
                    commands::run_replace(api, id, &fields).await
                }
                BooksCommand::Edit { id, fields } => {
                    commands::run_edit(api, page_size, id, &fields).await
                }
                BooksCommand::Delete { id, yes } => {
                    commands::run_delete(api, page_size, id, yes).await
                }
            }
        }
    }
}

/// Flags win over configuration. Commands other than `serve` stay quiet unless
/// `RUST_LOG` asks otherwise, so their stdout remains readable.
fn apply_overrides(cli: &Cli, settings: &mut Settings) {
    if let Some(url) = &cli.api_url {
        settings.client.api_base_url = url.clone();
    }
    if let Some(format) = cli.log_format {
        settings.telemetry.log_format = match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        };
    }
    if !matches!(cli.command, Command::Serve) {
        settings.telemetry.filter = "warn".to_string();
    }
}
