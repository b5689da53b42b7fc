//! Generation primitives: sampling parameters, the provider trait, and the
//! server-sent-events plumbing shared by streaming backends.

mod params;
mod sse;
mod traits;

pub use params::{
    GenerationParams, MAX_LENGTH_RANGE, MIN_NEW_TOKENS_DISABLED, TEMPERATURE_RANGE, TOP_P_RANGE,
};
pub use traits::{FragmentStream, GenerationProvider};

pub(crate) use sse::{create_sse_stream, SseVerdict};
