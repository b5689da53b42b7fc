//! A blog post generator built on Llama 2 models hosted on Replicate.
//!
//! The crate drives Replicate's streaming predictions API: a prediction is
//! created for a prompt, the server-sent-events stream it returns is
//! consumed, and the fragments are assembled into one finished post. Sampling
//! parameters are bounds-checked at the edges and API tokens never appear in
//! `Debug` output or logs.
//!
//! # Examples
//!
//! ```no_run
//! use bloggen::{GenerationProvider, ModelVariant, ReplicateBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bloggen::BlogGenError> {
//!     let client = ReplicateBuilder::new()
//!         .api_token(std::env::var("REPLICATE_API_TOKEN").unwrap_or_default())
//!         .model(ModelVariant::Llama2_13b)
//!         .temperature(0.7)
//!         .build()?;
//!
//!     let post = client
//!         .generate("Write a blog post about the borrow checker.")
//!         .await?;
//!     println!("{post}");
//!     Ok(())
//! }
//! ```

/// Backend implementations for supported model hosts.
pub mod backends;
/// Fluent builder for Replicate clients.
pub mod builder;
/// Error types used across the crate.
pub mod error;
/// Sampling parameters, the provider trait and SSE plumbing.
pub mod generation;
/// Catalog of supported model variants.
pub mod models;
/// Persistent storage for API tokens.
pub mod secret_store;
/// Mutable per-session state for front-ends.
pub mod session;
/// Token shape checks and redacted token handling.
pub mod token;

pub use backends::replicate::Replicate;
pub use builder::ReplicateBuilder;
pub use error::BlogGenError;
pub use generation::{FragmentStream, GenerationParams, GenerationProvider};
pub use models::ModelVariant;
pub use secret_store::SecretStore;
pub use session::Session;
pub use token::{ApiToken, TokenWarning};
