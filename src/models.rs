//! Catalog of the Llama 2 chat variants this crate can drive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BlogGenError;

const LLAMA2_7B_VERSION_REF: &str =
    "a16z-infra/llama7b-v2-chat:4f0a4744c7295c024a1de15e1a63c880d3da035fa1f49bfd344fe076074c8eea";
const LLAMA2_13B_VERSION_REF: &str =
    "a16z-infra/llama13b-v2-chat:df7690f1994d94e96ad9d568eac121aecf50684a0b0963b25a41cc40061269e5";

/// Selectable model variants, pinned to specific Replicate versions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVariant {
    /// 7 billion parameter chat model.
    #[default]
    #[serde(rename = "Llama2-7B")]
    Llama2_7b,
    /// 13 billion parameter chat model.
    #[serde(rename = "Llama2-13B")]
    Llama2_13b,
}

impl ModelVariant {
    /// Every selectable variant, in menu order.
    pub const ALL: [ModelVariant; 2] = [ModelVariant::Llama2_7b, ModelVariant::Llama2_13b];

    /// Display name shown in selection menus.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelVariant::Llama2_7b => "Llama2-7B",
            ModelVariant::Llama2_13b => "Llama2-13B",
        }
    }

    /// Full `owner/name:version` reference for this variant.
    pub fn version_ref(&self) -> &'static str {
        match self {
            ModelVariant::Llama2_7b => LLAMA2_7B_VERSION_REF,
            ModelVariant::Llama2_13b => LLAMA2_13B_VERSION_REF,
        }
    }

    /// The bare version hash the predictions endpoint expects.
    pub fn version_id(&self) -> &'static str {
        let full = self.version_ref();
        match full.split_once(':') {
            Some((_, id)) => id,
            None => full,
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelVariant {
    type Err = BlogGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "llama2-7b" => Ok(ModelVariant::Llama2_7b),
            "llama2-13b" => Ok(ModelVariant::Llama2_13b),
            _ => Err(BlogGenError::InvalidRequest(format!(
                "Unknown model variant: {s}. Expected one of: Llama2-7B, Llama2-13B"
            ))),
        }
    }
}
