use crate::config::{Config, DEFAULT_MODEL, DEFAULT_REQUEST_DELAY_SECS};
use crate::error::{Result, TranslateError};
use crate::language::LanguageEntry;
use crate::translate::{ContentGenerator, TranslationRequest};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tracing::{debug, error, info, warn};

/// Default source file name, looked up in the base directory.
pub const SOURCE_FILE_NAME: &str = "description_en.txt";

/// Default output subdirectory, created in the base directory.
pub const OUTPUT_DIR_NAME: &str = "output";

/// The English text being translated. Read once per run.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub text: String,
}

impl SourceDocument {
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TranslateError::FileNotFound(path.display().to_string()));
        }
        let text = fs::read_to_string(path).await?;
        debug!("Read {} bytes from {}", text.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }
}

/// Output file for a language: `<dir>/description_<code>.txt`.
pub fn output_path(output_dir: &Path, code: &str) -> PathBuf {
    output_dir.join(format!("description_{}.txt", code))
}

/// What happened to one language.
#[derive(Debug, Clone, PartialEq)]
pub enum LanguageOutcome {
    Written { path: PathBuf },
    Empty,
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct LanguageReport {
    pub language: LanguageEntry,
    pub outcome: LanguageOutcome,
}

/// Per-language outcomes of one run, in processing order.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub reports: Vec<LanguageReport>,
    pub total_time: Duration,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, LanguageOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, LanguageOutcome::Empty))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, LanguageOutcome::Failed { .. }))
    }

    pub fn outcome_for(&self, code: &str) -> Option<&LanguageOutcome> {
        self.reports
            .iter()
            .find(|r| r.language.code == code)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&LanguageOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Translates one document into each language in turn.
pub struct BatchRunner {
    generator: Box<dyn ContentGenerator>,
    model: String,
    delay: Duration,
    show_progress: bool,
}

impl BatchRunner {
    pub fn new(generator: Box<dyn ContentGenerator>) -> Self {
        Self {
            generator,
            model: DEFAULT_MODEL.to_string(),
            delay: Duration::from_secs(DEFAULT_REQUEST_DELAY_SECS),
            show_progress: true,
        }
    }

    /// Take model and delay from `config`.
    pub fn from_config(generator: Box<dyn ContentGenerator>, config: &Config) -> Self {
        Self::new(generator)
            .with_model(config.model.clone())
            .with_delay(config.request_delay())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Fixed pause before every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Enable or disable the spinner.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run every language sequentially. Per-language failures are logged
    /// and recorded, never returned.
    pub async fn run(
        &self,
        source: &SourceDocument,
        languages: &[LanguageEntry],
        output_dir: &Path,
    ) -> RunSummary {
        let start_time = Instant::now();

        info!(
            "Translating {} into {} language(s) using {} ({})",
            source.path.display(),
            languages.len(),
            self.generator.name(),
            self.model
        );

        let mut reports = Vec::with_capacity(languages.len());
        for language in languages {
            let outcome = self.translate_one(source, language, output_dir).await;
            reports.push(LanguageReport {
                language: language.clone(),
                outcome,
            });
        }

        RunSummary {
            reports,
            total_time: start_time.elapsed(),
        }
    }

    async fn translate_one(
        &self,
        source: &SourceDocument,
        language: &LanguageEntry,
        output_dir: &Path,
    ) -> LanguageOutcome {
        info!("{}", language);

        let spinner = self.spinner(language);

        if !self.delay.is_zero() {
            debug!("Waiting {:?} before request", self.delay);
            tokio::time::sleep(self.delay).await;
        }

        let request = TranslationRequest::for_language(language, &source.text, &self.model);
        let result = self.generator.generate(&request).await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        match result {
            Ok(Some(text)) if !text.is_empty() => {
                let path = output_path(output_dir, &language.code);
                match write_output(output_dir, &path, &text).await {
                    Ok(()) => {
                        info!("Wrote {} translation to {}", language.name, path.display());
                        LanguageOutcome::Written { path }
                    }
                    Err(e) => {
                        error!("Failed to write {}: {}", path.display(), e);
                        LanguageOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                }
            }
            Ok(_) => {
                warn!("No text returned in response for {}", language.code);
                LanguageOutcome::Empty
            }
            Err(e) => {
                error!("Failed to generate content for {}: {}", language.code, e);
                LanguageOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn spinner(&self, language: &LanguageEntry) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Translating into {}...", language.name));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

async fn write_output(output_dir: &Path, path: &Path, text: &str) -> Result<()> {
    fs::create_dir_all(output_dir).await?;
    fs::write(path, text).await?;
    Ok(())
}

/// Print a summary of the run.
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                      Translation Complete                      ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    for report in &summary.reports {
        let language = &report.language;
        match &report.outcome {
            LanguageOutcome::Written { path } => println!(
                "  {} {:<6} {}",
                style("✓").green(),
                language.code,
                path.display()
            ),
            LanguageOutcome::Empty => println!(
                "  {} {:<6} no text returned",
                style("-").yellow(),
                language.code
            ),
            LanguageOutcome::Failed { reason } => {
                println!("  {} {:<6} {}", style("✗").red(), language.code, reason)
            }
        }
    }
    println!();
    println!(
        "  Written: {}  Empty: {}  Failed: {}  ({:.2}s)",
        summary.written(),
        summary.skipped(),
        summary.failed(),
        summary.total_time.as_secs_f64()
    );
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
