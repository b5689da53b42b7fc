mod commands;
mod interactive;
mod one_shot;
mod token_resolve;

use clap::Parser;
use std::io::IsTerminal;

use bloggen::{
    BlogGenError, GenerationParams, GenerationProvider, ModelVariant, Replicate,
    ReplicateBuilder, Session,
};

use crate::args::CliArgs;
use crate::config::{load_config, AppConfig};
use crate::logging::init_logging;
use crate::term::Spinner;

const DEFAULT_PROMPT: &str = "Write a blog post about the impact of AI on modern education.";
const GENERATING_MESSAGE: &str = "Generating blog post...";

pub async fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let loaded = load_config(args.config.clone())?;
    init_logging(&loaded.config.logging, &loaded.paths)?;

    if let Some(kind) = args.command_kind() {
        commands::handle_command(kind, &args)?;
        return Ok(());
    }

    if args.has_one_shot_prompt() || !std::io::stdin().is_terminal() {
        return one_shot::run_one_shot(&args, &loaded.config).await;
    }

    interactive::run_interactive(&args, &loaded).await
}

/// Connection settings that do not live on the session.
struct ApiSettings {
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

fn api_settings(args: &CliArgs, config: &AppConfig) -> ApiSettings {
    ApiSettings {
        base_url: args.base_url.clone().or_else(|| config.api.base_url.clone()),
        timeout_seconds: config.api.timeout_seconds,
    }
}

/// Builds the starting session state from flags, config and stored secrets.
///
/// Flags win over config values; the token search order is the `--api-key`
/// flag, then the environment, then the secret store.
fn build_session(args: &CliArgs, config: &AppConfig) -> anyhow::Result<Session> {
    let mut session = Session::new();

    if let Some(token) = token_resolve::resolve_token(args) {
        session.set_token(token);
    }

    let model = match args.model.as_deref().or(config.default_model.as_deref()) {
        Some(name) => name.parse::<ModelVariant>()?,
        None => ModelVariant::default(),
    };
    session.set_model(model);

    let mut params = GenerationParams::new(
        config.generation.temperature,
        config.generation.top_p,
        config.generation.max_length,
    )?;
    if let Some(temperature) = args.temperature {
        params.set_temperature(temperature)?;
    }
    if let Some(top_p) = args.top_p {
        params.set_top_p(top_p)?;
    }
    if let Some(max_length) = args.max_length {
        params.set_max_length(max_length)?;
    }
    *session.params_mut() = params;

    Ok(session)
}

fn build_client(session: &Session, api: &ApiSettings) -> Result<Replicate, BlogGenError> {
    let params = session.params();
    let mut builder = ReplicateBuilder::new()
        .model(session.model())
        .temperature(params.temperature())
        .top_p(params.top_p())
        .max_length(params.max_length());
    if let Some(token) = session.token() {
        builder = builder.api_token(token.expose());
    }
    if let Some(base_url) = &api.base_url {
        builder = builder.base_url(base_url.as_str());
    }
    if let Some(timeout) = api.timeout_seconds {
        builder = builder.timeout_seconds(timeout);
    }
    builder.build()
}

/// Runs one all-or-nothing generation call with a spinner on stderr.
async fn run_generation(
    session: &Session,
    api: &ApiSettings,
    prompt: &str,
) -> Result<String, BlogGenError> {
    session.require_token()?;
    let client = build_client(session, api)?;

    let spinner = Spinner::start(GENERATING_MESSAGE);
    let result = client.generate(prompt).await;
    spinner.stop().await;
    result
}
