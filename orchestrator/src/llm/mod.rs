//! Language-model collaborators.
//!
//! Agents only see the [`LanguageModel`] trait; the HTTP client behind it is
//! chosen in `main` and fakes stand in for it in tests.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::debug;

mod openai;

pub use openai::ChatCompletionsClient;

use crate::error::LlmError;

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Free-text completion for a single user prompt.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Completion constrained to the given JSON schema. Returns the raw JSON document.
    async fn complete_json(
        &self,
        prompt: &str,
        schema_name: &str,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, LlmError>;
}

/// Ask the model for a `T` and decode it. Schema violations surface as errors.
pub async fn generate_structured<T>(model: &dyn LanguageModel, prompt: &str) -> Result<T, LlmError>
where
    T: DeserializeOwned + JsonSchema,
{
    let schema = serde_json::to_value(schemars::schema_for!(T))?;
    let name = T::schema_name();
    debug!(schema = %name, "generate_structured: requesting");

    let value = model.complete_json(prompt, &name, &schema).await?;
    serde_json::from_value(value)
        .map_err(|e| LlmError::InvalidResponse(format!("output does not match {name}: {e}")))
}
