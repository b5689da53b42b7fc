//! Fluent construction of [`Replicate`] clients.

use secrecy::{ExposeSecret, SecretString};

use crate::backends::replicate::Replicate;
use crate::error::BlogGenError;
use crate::generation::GenerationParams;
use crate::models::ModelVariant;

/// Builder for configuring and instantiating a Replicate client.
///
/// # Examples
///
/// ```no_run
/// use bloggen::{ModelVariant, ReplicateBuilder};
///
/// let client = ReplicateBuilder::new()
///     .api_token("r8_0123456789012345678901234567890123456")
///     .model(ModelVariant::Llama2_13b)
///     .temperature(0.7)
///     .max_length(300)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct ReplicateBuilder {
    api_token: Option<SecretString>,
    model: Option<ModelVariant>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    max_length: Option<u32>,
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

impl ReplicateBuilder {
    /// Creates a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API token used for authentication.
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    /// Sets the model variant to generate with.
    pub fn model(mut self, model: ModelVariant) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the nucleus sampling mass.
    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Sets the upper bound on generated length.
    pub fn max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Overrides the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets a request timeout in seconds.
    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Builds the client.
    ///
    /// Sampling values are bounds-checked here. A missing token is not a
    /// build error; it surfaces as an auth failure when generation is
    /// attempted.
    pub fn build(self) -> Result<Replicate, BlogGenError> {
        let mut params = GenerationParams::default();
        if let Some(temperature) = self.temperature {
            params.set_temperature(temperature)?;
        }
        if let Some(top_p) = self.top_p {
            params.set_top_p(top_p)?;
        }
        if let Some(max_length) = self.max_length {
            params.set_max_length(max_length)?;
        }

        let api_token = self
            .api_token
            .map(|token| token.expose_secret().clone())
            .unwrap_or_default();

        Ok(Replicate::new(
            api_token,
            self.model.unwrap_or_default(),
            params,
            self.base_url,
            self.timeout_seconds,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_settings_uses_catalog_defaults() {
        let client = ReplicateBuilder::new().build().unwrap();
        assert_eq!(client.model(), ModelVariant::Llama2_7b);
        assert_eq!(client.params(), GenerationParams::default());
        assert_eq!(client.base_url(), "https://api.replicate.com/v1");
        assert_eq!(client.timeout_seconds(), None);
    }

    #[test]
    fn build_applies_every_setting() {
        let client = ReplicateBuilder::new()
            .api_token("r8_0123456789012345678901234567890123456")
            .model(ModelVariant::Llama2_13b)
            .temperature(0.4)
            .top_p(0.5)
            .max_length(800)
            .base_url("http://localhost:8080")
            .timeout_seconds(30)
            .build()
            .unwrap();
        assert_eq!(client.model(), ModelVariant::Llama2_13b);
        assert_eq!(client.params().temperature(), 0.4);
        assert_eq!(client.params().top_p(), 0.5);
        assert_eq!(client.params().max_length(), 800);
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.timeout_seconds(), Some(30));
    }

    #[test]
    fn build_rejects_out_of_range_sampling_values() {
        assert!(ReplicateBuilder::new().temperature(1.5).build().is_err());
        assert!(ReplicateBuilder::new().top_p(-0.2).build().is_err());
        assert!(ReplicateBuilder::new().max_length(20).build().is_err());
    }

    #[test]
    fn build_succeeds_without_a_token() {
        assert!(ReplicateBuilder::new().build().is_ok());
    }
}
