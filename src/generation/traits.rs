use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};

use crate::error::BlogGenError;

/// A finite, ordered sequence of generated text fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, BlogGenError>> + Send>>;

/// Trait for backends that turn a prompt into generated text.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Opens one streaming generation call for `prompt`.
    ///
    /// Fragments arrive in generation order; each is yielded exactly once and
    /// the stream cannot be restarted.
    async fn generate_stream(&self, prompt: &str) -> Result<FragmentStream, BlogGenError>;

    /// Runs one generation call to completion and returns the assembled text.
    ///
    /// Fragments are concatenated in arrival order with no separator, then
    /// trimmed of leading and trailing whitespace. Any failure mid-stream
    /// aborts the whole call; no partial text is returned and nothing is
    /// retried.
    async fn generate(&self, prompt: &str) -> Result<String, BlogGenError> {
        let mut stream = self.generate_stream(prompt).await?;
        let mut output = String::new();
        while let Some(fragment) = stream.next().await {
            output.push_str(&fragment?);
        }
        Ok(output.trim().to_string())
    }
}

#[cfg(test)]
#[path = "traits_tests.rs"]
mod tests;
