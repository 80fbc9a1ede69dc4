use std::io;
use thiserror::Error;

/// Unified error type for the lessonforge service
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Missing or unusable service configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog rejected at load time
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Requested model id is not in the catalog
    #[error("Unknown model: {0}")]
    ModelNotFound(String),

    /// Requested bot personality id is not in the catalog
    #[error("Unknown bot personality: {0}")]
    PersonalityNotFound(String),

    /// No catalog entry is flagged active
    #[error("No active AI model found")]
    NoActiveModel,

    /// Caller input errors
    #[error("Input error: {0}")]
    Input(String),

    /// Non-success status from the inference provider
    #[error("OpenRouter API error: {status} - {message}")]
    Provider { status: u16, message: String },

    /// Success status but the body lacks the expected choice structure
    #[error("Invalid response from AI model")]
    InvalidResponse,

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ForgeError {
    /// Stable machine-readable tag surfaced to API callers.
    pub fn code(&self) -> &'static str {
        match self {
            ForgeError::Config(_) => "CONFIGURATION_ERROR",
            ForgeError::Catalog(_) => "CATALOG_INVALID",
            ForgeError::ModelNotFound(_) => "MODEL_NOT_FOUND",
            ForgeError::PersonalityNotFound(_) => "PERSONALITY_NOT_FOUND",
            ForgeError::NoActiveModel => "NO_ACTIVE_MODEL",
            ForgeError::Input(_) => "INVALID_REQUEST",
            ForgeError::Provider { .. }
            | ForgeError::InvalidResponse
            | ForgeError::Network(_)
            | ForgeError::Serialization(_)
            | ForgeError::Io { .. } => "AI_GENERATION_FAILED",
        }
    }
}

impl From<reqwest::Error> for ForgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ForgeError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ForgeError::Network(format!("Connection failed: {}", err))
        } else {
            ForgeError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ForgeError {
    fn from(err: serde_json::Error) -> Self {
        ForgeError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for ForgeError {
    fn from(err: serde_yml::Error) -> Self {
        ForgeError::Serialization(format!("YAML error: {}", err))
    }
}
