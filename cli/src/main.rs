//! Desktop host for the screen controllers.
//!
//! Runs one screen's query end to end: submit, execute the ticket with
//! `ureq`, settle, print. Point `--base-url` at the mock server to work
//! offline.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use screens_core::{App, Config, Endpoints, HttpRequest, HttpResponse, Outcome, Phase, Screen, TransportError};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "screens", about = "Query the public-API screens from a terminal")]
struct Cli {
    /// Serve every provider from one host (the mock server layout).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Weather provider key; overrides WEATHER_API_KEY.
    #[arg(long, global = true)]
    weather_key: Option<String>,

    /// Print the raw state snapshot instead of the rendered screen.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict gender from a first name.
    Gender { name: String },
    /// Predict age from a first name.
    Age { name: String },
    /// List universities of a country (English name).
    Universities { country: String },
    /// Current weather in Santo Domingo.
    Weather,
    /// Look up a Pokémon by name.
    Creature { name: String },
    /// Latest posts from the blog feed.
    Articles,
}

impl Command {
    fn screen(&self) -> Screen {
        match self {
            Command::Gender { .. } => Screen::Gender,
            Command::Age { .. } => Screen::Age,
            Command::Universities { .. } => Screen::Universities,
            Command::Weather => Screen::Weather,
            Command::Creature { .. } => Screen::Creature,
            Command::Articles => Screen::Articles,
        }
    }

    fn input(&self) -> Option<&str> {
        match self {
            Command::Gender { name } | Command::Age { name } | Command::Creature { name } => Some(name),
            Command::Universities { country } => Some(country),
            Command::Weather | Command::Articles => None,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Applies the command-line overrides on top of the environment's config.
fn config_from(cli: &Cli, mut config: Config) -> Config {
    if let Some(base_url) = &cli.base_url {
        config.endpoints = Endpoints::mirrored(base_url);
    }
    if let Some(key) = cli.weather_key.as_deref().filter(|k| !k.trim().is_empty()) {
        config = config.with_weather_api_key(key.trim());
    }
    config
}

/// Execute an `HttpRequest` using ureq.
///
/// Status codes come back as data; only a failed round-trip is an error.
fn execute(agent: &ureq::Agent, req: &HttpRequest) -> Outcome {
    let mut builder = agent.get(&req.url);
    for (key, value) in &req.headers {
        builder = builder.header(key, value);
    }
    let mut response = builder
        .call()
        .map_err(|err| TransportError::new(err.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|err| TransportError::new(err.to_string()))?;
    Ok(HttpResponse::new(status, body))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    let mut app = App::new(config_from(&cli, Config::from_env()));
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let screen = cli.command.screen();
    let controller = app.controller_mut(screen);
    if let Some(ticket) = controller.submit(cli.command.input()) {
        info!(screen = screen.as_str(), token = ticket.token.get(), "executing request");
        let outcome = execute(&agent, &ticket.request);
        let settlement = controller.settle(ticket.token, outcome);
        debug!(?settlement, "settled");
    }

    if cli.json {
        let snapshot = app
            .controller(screen)
            .snapshot_json()
            .context("serializing screen state")?;
        println!("{snapshot}");
    } else {
        render::print(&app, screen);
    }

    Ok(ExitCode::from(exit_status(app.controller(screen).phase())))
}

/// Non-zero only when the screen ends showing its error message.
fn exit_status(phase: Phase) -> u8 {
    match phase {
        Phase::Error => 1,
        Phase::Idle | Phase::Loading | Phase::Success => 0,
    }
}
