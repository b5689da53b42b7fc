//! Replicate API token handling.
//!
//! Tokens are checked in two independent steps: a syntactic shape check that
//! only ever produces a warning, and a presence check that blocks generation.
//! A malformed token is still sent to the API if the caller insists; the
//! server stays the authority on validity.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Prefix every well-formed Replicate API token starts with.
pub const TOKEN_PREFIX: &str = "r8_";

/// Total character count of a well-formed token, prefix included.
pub const TOKEN_LEN: usize = 40;

/// Returns true when `raw` matches the published token shape.
pub fn has_valid_shape(raw: &str) -> bool {
    shape_warning(raw).is_none()
}

/// Syntactic check of `raw` against the published token shape.
///
/// Returns `None` for a well-formed token. The result is advisory only and
/// never blocks an API call.
pub fn shape_warning(raw: &str) -> Option<TokenWarning> {
    if !raw.starts_with(TOKEN_PREFIX) {
        return Some(TokenWarning::BadPrefix);
    }
    let len = raw.chars().count();
    if len != TOKEN_LEN {
        return Some(TokenWarning::BadLength(len));
    }
    None
}

/// Masked rendering of a token for display, keeping the prefix and the last
/// four characters.
pub fn fingerprint(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() <= TOKEN_PREFIX.len() + 4 {
        return "\u{2022}\u{2022}\u{2022}".to_string();
    }
    let head: String = chars[..TOKEN_PREFIX.len()].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}\u{2026}{tail}")
}

/// Advisory finding from the token shape check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenWarning {
    /// Token does not start with [`TOKEN_PREFIX`].
    BadPrefix,
    /// Token is not [`TOKEN_LEN`] characters long; carries the actual count.
    BadLength(usize),
}

impl fmt::Display for TokenWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenWarning::BadPrefix => {
                write!(f, "Replicate API tokens start with \"{TOKEN_PREFIX}\"")
            }
            TokenWarning::BadLength(len) => {
                write!(f, "expected a {TOKEN_LEN} character token, got {len}")
            }
        }
    }
}

/// A Replicate API token held in memory.
///
/// The raw value never appears in `Debug` output; callers reach it through
/// [`ApiToken::expose`] at the point of use.
#[derive(Clone)]
pub struct ApiToken(SecretString);

impl ApiToken {
    /// Wraps `raw` verbatim. No validation happens here.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::new(raw.into()))
    }

    /// The raw token value.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Shape check of the wrapped value, see [`shape_warning`].
    pub fn shape_warning(&self) -> Option<TokenWarning> {
        shape_warning(self.expose())
    }

    /// Masked rendering safe for terminals and logs.
    pub fn fingerprint(&self) -> String {
        fingerprint(self.expose())
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken([REDACTED])")
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
