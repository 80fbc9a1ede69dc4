use crate::core::error::ForgeError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

mod builtin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenRouter,
    OpenAI,
    Anthropic,
    Google,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityKind {
    TextGeneration,
    CodeGeneration,
    Analysis,
    CreativeWriting,
    Education,
    Assessment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capability {
    #[serde(rename = "type")]
    pub kind: CapabilityKind,
    pub proficiency: Proficiency,
    pub description: String,
}

/// Descriptive extras carried on a model entry. Not behaviorally load-bearing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_data: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strengths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub limitations: Vec<String>,
}

/// One entry in the model catalog. `provider_model_id` is the identifier the
/// inference provider expects on the wire; `id` is ours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSpec {
    pub id: String,
    pub name: String,
    pub description: String,
    pub provider: Provider,
    pub provider_model_id: String,
    pub capabilities: Vec<Capability>,
    pub max_tokens: u32,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ModelMetadata>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Friendly,
    Enthusiastic,
    Academic,
    Creative,
}

/// A reusable system-prompt preset shaping the tone of generated summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotPersonality {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tone: Tone,
    pub expertise: Vec<String>,
    pub system_prompt: String,
    #[serde(default)]
    pub examples: Vec<String>,
    pub is_active: bool,
}

/// Static catalog of models and bot personalities. Built once at startup and
/// shared read-only; lookups are pure and absence is `None`, never an error.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    models: Vec<ModelSpec>,
    personalities: Vec<BotPersonality>,
}

impl Catalog {
    pub fn new(models: Vec<ModelSpec>, personalities: Vec<BotPersonality>) -> Self {
        Self {
            models,
            personalities,
        }
    }

    /// Catalog compiled into the binary, used when no catalog file is configured.
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    /// Parse a YAML catalog file. Validation is a separate step so callers
    /// decide when to enforce the active-entry invariant.
    pub fn from_path(path: &Path) -> Result<Self, ForgeError> {
        let contents = fs::read_to_string(path)?;
        serde_yml::from_str(&contents)
            .map_err(|e| ForgeError::Catalog(format!("Parse {}: {}", path.display(), e)))
    }

    /// Startup invariant: unique ids and exactly one active entry per kind.
    pub fn validate(&self) -> Result<(), ForgeError> {
        let mut seen = HashSet::new();
        for model in &self.models {
            if !seen.insert(model.id.as_str()) {
                return Err(ForgeError::Catalog(format!("Duplicate model id: {}", model.id)));
            }
        }
        let mut seen = HashSet::new();
        for personality in &self.personalities {
            if !seen.insert(personality.id.as_str()) {
                return Err(ForgeError::Catalog(format!(
                    "Duplicate personality id: {}",
                    personality.id
                )));
            }
        }

        match self.models.iter().filter(|m| m.is_active).count() {
            1 => {}
            0 => return Err(ForgeError::Catalog("No model is marked active".to_string())),
            n => {
                return Err(ForgeError::Catalog(format!("{} models are marked active", n)));
            }
        }
        match self.personalities.iter().filter(|p| p.is_active).count() {
            1 => {}
            0 => {
                return Err(ForgeError::Catalog(
                    "No bot personality is marked active".to_string(),
                ));
            }
            n => {
                return Err(ForgeError::Catalog(format!(
                    "{} bot personalities are marked active",
                    n
                )));
            }
        }
        Ok(())
    }

    /// First active entry in declaration order.
    pub fn active_model(&self) -> Option<&ModelSpec> {
        self.models.iter().find(|m| m.is_active)
    }

    pub fn model_by_id(&self, id: &str) -> Option<&ModelSpec> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn active_personality(&self) -> Option<&BotPersonality> {
        self.personalities.iter().find(|p| p.is_active)
    }

    pub fn personality_by_id(&self, id: &str) -> Option<&BotPersonality> {
        self.personalities.iter().find(|p| p.id == id)
    }

    /// Full model list in declaration order, used for status reporting.
    pub fn models(&self) -> &[ModelSpec] {
        &self.models
    }
}
