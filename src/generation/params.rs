use std::fmt::Display;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::BlogGenError;

/// Inclusive range accepted for `temperature`.
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Inclusive range accepted for `top_p`.
pub const TOP_P_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Inclusive range accepted for `max_length`.
pub const MAX_LENGTH_RANGE: RangeInclusive<u32> = 50..=1000;

/// Sentinel the backend reads as "no minimum on generated tokens".
pub const MIN_NEW_TOKENS_DISABLED: i64 = -1;

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TOP_P: f32 = 0.9;
const DEFAULT_MAX_LENGTH: u32 = 300;

/// Sampling parameters for one generation call.
///
/// Bounds are enforced when a value enters through a setter or through
/// [`GenerationParams::new`]; stored values reach the wire verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    temperature: f32,
    top_p: f32,
    max_length: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl GenerationParams {
    /// Builds a parameter set, rejecting any out-of-range value.
    pub fn new(temperature: f32, top_p: f32, max_length: u32) -> Result<Self, BlogGenError> {
        let mut params = Self::default();
        params.set_temperature(temperature)?;
        params.set_top_p(top_p)?;
        params.set_max_length(max_length)?;
        Ok(params)
    }

    /// Randomness of sampling, between 0.0 and 1.0.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Nucleus sampling mass, between 0.0 and 1.0.
    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    /// Upper bound on generated length, between 50 and 1000.
    pub fn max_length(&self) -> u32 {
        self.max_length
    }

    pub fn set_temperature(&mut self, value: f32) -> Result<(), BlogGenError> {
        ensure_in_range("temperature", value, &TEMPERATURE_RANGE)?;
        self.temperature = value;
        Ok(())
    }

    pub fn set_top_p(&mut self, value: f32) -> Result<(), BlogGenError> {
        ensure_in_range("top_p", value, &TOP_P_RANGE)?;
        self.top_p = value;
        Ok(())
    }

    pub fn set_max_length(&mut self, value: u32) -> Result<(), BlogGenError> {
        ensure_in_range("max_length", value, &MAX_LENGTH_RANGE)?;
        self.max_length = value;
        Ok(())
    }

    /// Re-checks stored values against the ranges.
    ///
    /// Deserialized values bypass the setters, so boundaries that accept
    /// serialized parameters call this before using them.
    pub fn validate(&self) -> Result<(), BlogGenError> {
        Self::new(self.temperature, self.top_p, self.max_length).map(|_| ())
    }
}

fn ensure_in_range<T>(name: &str, value: T, range: &RangeInclusive<T>) -> Result<(), BlogGenError>
where
    T: PartialOrd + Copy + Display,
{
    if range.contains(&value) {
        return Ok(());
    }
    Err(BlogGenError::InvalidRequest(format!(
        "{name} must be between {} and {}, got {value}",
        range.start(),
        range.end()
    )))
}
