use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a Groq model identifier.
///
/// This can be a model known to this crate or a custom string value for
/// models hosted after this crate was written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier
    Custom(String),
}

/// Known Groq-hosted models
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Llama 3 8B with an 8192 token context
    #[serde(rename = "llama3-8b-8192")]
    Llama3_8b8192,

    /// Llama 3 70B with an 8192 token context
    #[serde(rename = "llama3-70b-8192")]
    Llama3_70b8192,

    /// Llama 3.1 8B instant
    #[serde(rename = "llama-3.1-8b-instant")]
    Llama31_8bInstant,

    /// Llama 3.3 70B versatile
    #[serde(rename = "llama-3.3-70b-versatile")]
    Llama33_70bVersatile,

    /// Gemma 2 9B instruction tuned
    #[serde(rename = "gemma2-9b-it")]
    Gemma2_9bIt,
}

impl KnownModel {
    const ALL: [KnownModel; 5] = [
        KnownModel::Llama3_8b8192,
        KnownModel::Llama3_70b8192,
        KnownModel::Llama31_8bInstant,
        KnownModel::Llama33_70bVersatile,
        KnownModel::Gemma2_9bIt,
    ];

    /// The wire identifier of this model.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownModel::Llama3_8b8192 => "llama3-8b-8192",
            KnownModel::Llama3_70b8192 => "llama3-70b-8192",
            KnownModel::Llama31_8bInstant => "llama-3.1-8b-instant",
            KnownModel::Llama33_70bVersatile => "llama-3.3-70b-versatile",
            KnownModel::Gemma2_9bIt => "gemma2-9b-it",
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Known(KnownModel::Llama3_8b8192)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    /// Parse a model identifier, falling back to `Model::Custom` for unknown names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(KnownModel::ALL
            .iter()
            .find(|known| known.as_str() == s)
            .map(|known| Model::Known(*known))
            .unwrap_or_else(|| Model::Custom(s.to_string())))
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        model.as_str().into()
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        match model.parse::<Model>() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}
