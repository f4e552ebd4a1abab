pub mod config;
pub mod error;
pub mod language;
pub mod runner;
pub mod translate;

pub use config::Config;
pub use error::{Result, TranslateError};
pub use language::LanguageEntry;
pub use runner::{print_summary, BatchRunner, LanguageOutcome, RunSummary, SourceDocument};
pub use translate::{ContentGenerator, GeminiClient, TranslationRequest};
