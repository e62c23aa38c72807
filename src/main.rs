use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use codeassist_core::{Config, Mode, OllamaClient};

mod app;
mod handler;
mod highlight;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "codeassist", version)]
#[command(about = "Chat with a local Ollama model to generate or debug Python code")]
struct Cli {
    /// Ollama base URL (overrides the config file)
    #[arg(long)]
    url: Option<String>,
    /// Model to query (overrides the config file)
    #[arg(short, long)]
    model: Option<String>,
    /// Starting mode: generate or debug
    #[arg(long, value_parser = parse_mode)]
    mode: Option<Mode>,
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    Mode::from_str(s).ok_or_else(|| format!("unknown mode '{}', expected 'generate' or 'debug'", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = logging::init();

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to default config");
        Config::new()
    });

    let url = cli.url.unwrap_or_else(|| config.ollama_url().to_string());
    let model = cli.model.unwrap_or_else(|| config.model().to_string());
    tracing::info!(
        url = %url,
        model = %model,
        log = ?log_path,
        "starting codeassist"
    );

    let client = OllamaClient::new(&url, &model);
    let mut app = App::new(Arc::new(client.clone()), client.base_url(), cli.mode.unwrap_or_default());
    app.start_probe(client);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &mut app).await;

    tui::restore()?;
    tracing::info!(turns = app.conversation.turns().len(), "exiting");
    result
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        let Some(event) = events.next().await else {
            break;
        };
        handler::handle_event(app, event);
        app.poll_tasks().await;
    }

    Ok(())
}
