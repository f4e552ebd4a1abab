pub mod gemini;

pub use gemini::GeminiClient;

use crate::error::Result;
use crate::language::LanguageEntry;
use async_trait::async_trait;

/// Sampling temperature for every translation request (greedy decoding).
pub const TRANSLATION_TEMPERATURE: f32 = 0.0;

/// Token the model is told to leave untranslated.
pub const PRESERVED_TERM: &str = "Gemini";

/// A single translation call: instruction plus the user-role content.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub system_instruction: String,
    pub user_content: String,
    pub temperature: f32,
    pub model: String,
}

impl TranslationRequest {
    /// Build the request translating `content` into `language`.
    pub fn for_language(language: &LanguageEntry, content: &str, model: &str) -> Self {
        Self {
            system_instruction: system_instruction(&language.name),
            user_content: content.to_string(),
            temperature: TRANSLATION_TEMPERATURE,
            model: model.to_string(),
        }
    }
}

/// Formal-tone translation directive naming the target language.
pub fn system_instruction(language_name: &str) -> String {
    format!(
        "Translate the following content into {language_name} using a formal tone. \
         Keep the word {PRESERVED_TERM} in English. \
         Output in plain text without using Markdown."
    )
}

/// Remote text generation. `Ok(None)` means the service returned no text.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &TranslationRequest) -> Result<Option<String>>;
    fn name(&self) -> &'static str;
}
