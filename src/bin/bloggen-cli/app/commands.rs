use bloggen::{token, SecretStore};

use crate::args::{CliArgs, CommandKind};

use super::token_resolve::TOKEN_SECRET_KEY;

pub fn handle_command(kind: CommandKind, args: &CliArgs) -> anyhow::Result<()> {
    let mut store = SecretStore::new()?;
    match kind {
        CommandKind::Set => handle_set(&mut store, args)?,
        CommandKind::Get => handle_get(&store),
        CommandKind::Clear => handle_clear(&mut store)?,
    }
    Ok(())
}

fn handle_set(store: &mut SecretStore, args: &CliArgs) -> anyhow::Result<()> {
    let Some(value) = args.value.as_deref() else {
        anyhow::bail!("usage: bloggen set <token>");
    };
    if let Some(warning) = token::shape_warning(value) {
        eprintln!("warning: {warning}");
    }
    store.set(TOKEN_SECRET_KEY, value)?;
    println!("Replicate API token stored.");
    Ok(())
}

fn handle_get(store: &SecretStore) {
    match store.get(TOKEN_SECRET_KEY) {
        Some(value) => println!("replicate: {}", token::fingerprint(value)),
        None => println!("No Replicate API token stored."),
    }
}

fn handle_clear(store: &mut SecretStore) -> anyhow::Result<()> {
    store.delete(TOKEN_SECRET_KEY)?;
    println!("Replicate API token cleared.");
    Ok(())
}
