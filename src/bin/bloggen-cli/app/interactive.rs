use std::io::{self, BufRead, Write};

use bloggen::{BlogGenError, ModelVariant, Session};

use crate::args::CliArgs;
use crate::config::{save_config, LoadedConfig};
use crate::term::read_masked_line;

use super::{api_settings, build_session, run_generation, ApiSettings, DEFAULT_PROMPT};

pub(super) async fn run_interactive(args: &CliArgs, loaded: &LoadedConfig) -> anyhow::Result<()> {
    let api = api_settings(args, &loaded.config);
    let mut session = build_session(args, &loaded.config)?;

    println!("Blog Generator");
    println!("Type a prompt and press Enter to generate a post. /help lists commands.");
    println!("An empty line generates the sample prompt: {DEFAULT_PROMPT}");
    println!();

    if session.token().is_none() {
        prompt_for_token(&mut session)?;
    }
    report_token_state(&session);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("blog> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        if matches!(input, "/quit" | "/exit") {
            break;
        }
        if input.starts_with('/') {
            handle_slash(input, &mut session, loaded)?;
            continue;
        }

        let prompt = if input.is_empty() { DEFAULT_PROMPT } else { input };
        generate_and_print(&session, &api, prompt).await;
    }
    Ok(())
}

async fn generate_and_print(session: &Session, api: &ApiSettings, prompt: &str) {
    match run_generation(session, api, prompt).await {
        Ok(text) => {
            println!();
            println!("{text}");
            println!();
        }
        Err(err) => {
            eprintln!("Error: {err}");
            if matches!(err, BlogGenError::AuthError(_)) {
                eprintln!("Set a Replicate API token with /token before generating.");
            } else {
                eprintln!("Failed to generate blog post.");
            }
        }
    }
}

fn handle_slash(input: &str, session: &mut Session, loaded: &LoadedConfig) -> anyhow::Result<()> {
    let rest = &input[1..];
    let (command, arg) = match rest.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (rest, ""),
    };

    let outcome = match command {
        "model" => set_model(session, arg),
        "temperature" => set_temperature(session, arg),
        "top-p" => set_top_p(session, arg),
        "max-length" => set_max_length(session, arg),
        "save" => save_session_defaults(session, loaded),
        "token" => {
            prompt_for_token(session)?;
            report_token_state(session);
            Ok(())
        }
        "clear-token" => {
            session.clear_token();
            println!("API token cleared.");
            Ok(())
        }
        "settings" => {
            print_settings(session);
            Ok(())
        }
        "help" => {
            print_help();
            Ok(())
        }
        other => Err(anyhow::anyhow!(
            "unknown command /{other}; /help lists commands"
        )),
    };

    if let Err(err) = outcome {
        eprintln!("{err}");
    }
    Ok(())
}

fn set_model(session: &mut Session, arg: &str) -> anyhow::Result<()> {
    if arg.is_empty() {
        println!("Current model: {}", session.model());
        print_model_options();
        return Ok(());
    }
    let model: ModelVariant = arg.parse()?;
    session.set_model(model);
    println!("Model set to {model}.");
    Ok(())
}

fn set_temperature(session: &mut Session, arg: &str) -> anyhow::Result<()> {
    if arg.is_empty() {
        println!("Current temperature: {}", session.params().temperature());
        return Ok(());
    }
    let value: f32 = arg
        .parse()
        .map_err(|_| anyhow::anyhow!("temperature expects a number, got {arg:?}"))?;
    session.params_mut().set_temperature(value)?;
    println!("Temperature set to {value}.");
    Ok(())
}

fn set_top_p(session: &mut Session, arg: &str) -> anyhow::Result<()> {
    if arg.is_empty() {
        println!("Current top_p: {}", session.params().top_p());
        return Ok(());
    }
    let value: f32 = arg
        .parse()
        .map_err(|_| anyhow::anyhow!("top-p expects a number, got {arg:?}"))?;
    session.params_mut().set_top_p(value)?;
    println!("top_p set to {value}.");
    Ok(())
}

fn set_max_length(session: &mut Session, arg: &str) -> anyhow::Result<()> {
    if arg.is_empty() {
        println!("Current max_length: {}", session.params().max_length());
        return Ok(());
    }
    let value: u32 = arg
        .parse()
        .map_err(|_| anyhow::anyhow!("max-length expects an integer, got {arg:?}"))?;
    session.params_mut().set_max_length(value)?;
    println!("max_length set to {value}.");
    Ok(())
}

/// Writes the session's model and sampling values back to the config file,
/// so the next run starts from them. The token is never written here.
fn save_session_defaults(session: &Session, loaded: &LoadedConfig) -> anyhow::Result<()> {
    let params = session.params();
    let mut config = loaded.config.clone();
    config.default_model = Some(session.model().to_string());
    config.generation.temperature = params.temperature();
    config.generation.top_p = params.top_p();
    config.generation.max_length = params.max_length();
    save_config(&config, &loaded.paths).map_err(|err| anyhow::anyhow!("save config: {err}"))?;
    println!("Defaults saved to {}.", loaded.paths.config_file.display());
    Ok(())
}

fn prompt_for_token(session: &mut Session) -> anyhow::Result<()> {
    match read_masked_line("Enter Replicate API token (Esc to skip): ")? {
        Some(value) if !value.is_empty() => session.set_token(value),
        Some(_) => println!("No token entered; generation will need one."),
        None => println!("Token entry cancelled."),
    }
    Ok(())
}

fn report_token_state(session: &Session) {
    if let Some(warning) = session.token_warning() {
        println!("warning: {warning}");
    } else if session.token().is_some() {
        println!("API token set. Enter your blog prompt below!");
    } else {
        println!("No API token set; /token adds one.");
    }
}

fn print_settings(session: &Session) {
    let params = session.params();
    println!("  model        {}", session.model());
    println!("  temperature  {}", params.temperature());
    println!("  top_p        {}", params.top_p());
    println!("  max_length   {}", params.max_length());
    match session.token() {
        Some(token) => println!("  token        {}", token.fingerprint()),
        None => println!("  token        (not set)"),
    }
}

fn print_model_options() {
    let names: Vec<&str> = ModelVariant::ALL
        .iter()
        .map(ModelVariant::display_name)
        .collect();
    println!("Available models: {}", names.join(", "));
}

fn print_help() {
    println!("  /model [name]        show or switch the model");
    print_model_options();
    println!("  /temperature [0..1]  show or set the sampling temperature");
    println!("  /top-p [0..1]        show or set the nucleus sampling mass");
    println!("  /max-length [n]      show or set the length cap (50..1000)");
    println!("  /token               enter an API token (input is masked)");
    println!("  /clear-token         forget the session token");
    println!("  /settings            show the current session settings");
    println!("  /save                keep the current settings as defaults");
    println!("  /quit                leave");
}
