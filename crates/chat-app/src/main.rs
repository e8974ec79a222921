#![deny(unsafe_code)]

mod app;

use std::path::PathBuf;
use std::process::ExitCode;

use chatdock_ui::theme::Appearance;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::app::{Session, SessionOptions};

/// Chat with a backend through the widget from the terminal, then write the
/// rendered widget as an HTML preview.
#[derive(Debug, Parser)]
#[command(name = "chatdock", version, about)]
struct Cli {
    /// Widget config file (JSON). Defaults to the user config directory.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Base URL of the chat backend. Without it messages get no reply.
    #[arg(long, short)]
    endpoint: Option<String>,

    /// Session id; a fresh UUID when omitted.
    #[arg(long)]
    session: Option<String>,

    /// Post to `/chat/query-config` instead of `/chat/query`.
    #[arg(long)]
    query_config: bool,

    /// Load the session history before chatting.
    #[arg(long)]
    history: bool,

    /// Theme preset, overriding the config file.
    #[arg(long)]
    theme: Option<String>,

    /// Simulated system appearance for the `auto` theme.
    #[arg(long, value_enum)]
    appearance: Option<AppearanceArg>,

    /// Where to write the HTML preview.
    #[arg(long, short, default_value = "chatdock-preview.html")]
    out: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AppearanceArg {
    Light,
    Dark,
}

impl From<AppearanceArg> for Appearance {
    fn from(value: AppearanceArg) -> Self {
        match value {
            AppearanceArg::Light => Appearance::Light,
            AppearanceArg::Dark => Appearance::Dark,
        }
    }
}

impl From<Cli> for SessionOptions {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            endpoint: cli.endpoint,
            session_id: cli.session,
            query_config: cli.query_config,
            history: cli.history,
            theme: cli.theme,
            appearance: cli.appearance.map(Into::into),
            out: cli.out,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = SessionOptions::from(Cli::parse());
    match run(&options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "chatdock failed");
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(options: &SessionOptions) -> Result<(), app::AppError> {
    let mut session = Session::start(options).await?;
    if let Some(session_id) = session.session_id() {
        tracing::info!(session_id, "chat session started");
    }
    session.run_stdin().await?;
    session.finish(&options.out)
}
