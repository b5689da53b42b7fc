use std::io::{self, IsTerminal, Read};

use crate::args::CliArgs;
use crate::config::AppConfig;

use super::{api_settings, build_session, run_generation, DEFAULT_PROMPT};

pub(super) async fn run_one_shot(args: &CliArgs, config: &AppConfig) -> anyhow::Result<()> {
    let prompt = resolve_prompt(args)?;
    let api = api_settings(args, config);
    let session = build_session(args, config)?;

    if let Some(warning) = session.token_warning() {
        eprintln!("warning: {warning}");
    }
    session.require_token().map_err(|err| {
        anyhow::anyhow!("{err}; run `bloggen set <token>` or export REPLICATE_API_TOKEN")
    })?;

    let text = run_generation(&session, &api, &prompt).await?;
    println!("{text}");
    Ok(())
}

fn resolve_prompt(args: &CliArgs) -> anyhow::Result<String> {
    if let Some(prompt) = args.prompt.clone() {
        return Ok(prompt);
    }
    if let Some(prompt) = prompt_from_positionals(args) {
        return Ok(prompt);
    }
    if let Some(prompt) = prompt_from_stdin()? {
        return Ok(prompt);
    }
    Ok(DEFAULT_PROMPT.to_string())
}

fn prompt_from_positionals(args: &CliArgs) -> Option<String> {
    if args.command_kind().is_some() {
        return None;
    }
    let command = args.command.clone()?;
    match args.value.as_deref() {
        Some(value) => Some(format!("{command} {value}")),
        None => Some(command),
    }
}

fn prompt_from_stdin() -> anyhow::Result<Option<String>> {
    if io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}
