//! Per-session state for interactive front-ends.
//!
//! The token lives here instead of in process-wide environment state, so two
//! sessions in one process cannot see each other's credentials and clearing
//! a token is observable immediately.

use crate::error::BlogGenError;
use crate::generation::GenerationParams;
use crate::models::ModelVariant;
use crate::token::{ApiToken, TokenWarning};

/// Mutable state backing one interactive session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<ApiToken>,
    model: ModelVariant,
    params: GenerationParams,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` verbatim; no validation of any kind happens here.
    pub fn set_token(&mut self, value: impl Into<String>) {
        self.token = Some(ApiToken::new(value));
    }

    /// Forgets the stored token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&ApiToken> {
        self.token.as_ref()
    }

    /// Advisory shape check of the stored token.
    ///
    /// `None` means a well-formed token or no token at all; absence is the
    /// blocking condition and belongs to [`Session::require_token`].
    pub fn token_warning(&self) -> Option<TokenWarning> {
        self.token.as_ref().and_then(ApiToken::shape_warning)
    }

    /// Presence check run right before generation.
    ///
    /// A malformed token passes; only a missing or empty one blocks.
    pub fn require_token(&self) -> Result<&ApiToken, BlogGenError> {
        match &self.token {
            Some(token) if !token.expose().is_empty() => Ok(token),
            _ => Err(BlogGenError::AuthError(
                "No Replicate API token set for this session".to_string(),
            )),
        }
    }

    pub fn model(&self) -> ModelVariant {
        self.model
    }

    pub fn set_model(&mut self, model: ModelVariant) {
        self.model = model;
    }

    pub fn params(&self) -> GenerationParams {
        self.params
    }

    pub fn params_mut(&mut self) -> &mut GenerationParams {
        &mut self.params
    }
}
