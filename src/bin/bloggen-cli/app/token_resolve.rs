use bloggen::SecretStore;

use crate::args::CliArgs;

/// Key the Replicate token is stored under in the secret store.
pub(super) const TOKEN_SECRET_KEY: &str = "replicate";
/// Environment variable checked for a Replicate token.
pub(super) const TOKEN_ENV_KEY: &str = "REPLICATE_API_TOKEN";

/// Finds a token without prompting: flag, then environment, then store.
pub(super) fn resolve_token(args: &CliArgs) -> Option<String> {
    if let Some(value) = args.api_key.as_deref() {
        return Some(value.to_string());
    }
    if let Ok(value) = std::env::var(TOKEN_ENV_KEY) {
        if !value.is_empty() {
            return Some(value);
        }
    }
    SecretStore::new()
        .ok()
        .and_then(|store| store.get(TOKEN_SECRET_KEY).cloned())
}
