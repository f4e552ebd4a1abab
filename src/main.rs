use anyhow::{Context, Result};
use clap::Parser;
use desc_translate::config::{Config, API_KEY_ENV};
use desc_translate::runner::{OUTPUT_DIR_NAME, SOURCE_FILE_NAME};
use desc_translate::{print_summary, BatchRunner, GeminiClient, LanguageEntry, SourceDocument};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "desc-translate")]
#[command(version, about = "Translate a plain-text description with Gemini")]
#[command(
    long_about = "Reads description_en.txt, asks Gemini for a formal translation per target language, and writes output/description_<code>.txt."
)]
struct Cli {
    /// Directory holding description_en.txt and the output/ folder
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Source text file (defaults to <base-dir>/description_en.txt)
    #[arg(long)]
    source: Option<PathBuf>,

    /// Output directory (defaults to <base-dir>/output)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Target language as CODE or CODE=NAME, e.g. de=German (repeatable)
    #[arg(short, long = "language")]
    languages: Vec<LanguageEntry>,

    /// Gemini model identifier
    #[arg(long)]
    model: Option<String>,

    /// Seconds to wait before each request
    #[arg(long)]
    delay: Option<u64>,

    /// Disable the progress spinner
    #[arg(long)]
    no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn source_path(&self) -> PathBuf {
        self.source
            .clone()
            .unwrap_or_else(|| self.base_dir.join(SOURCE_FILE_NAME))
    }

    fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.base_dir.join(OUTPUT_DIR_NAME))
    }

    /// Flags win over file and environment settings.
    fn apply_overrides(&self, config: &mut Config) {
        if !self.languages.is_empty() {
            config.languages = self.languages.clone();
        }
        if let Some(ref model) = self.model {
            config.model = model.clone();
        }
        if let Some(delay) = self.delay {
            config.request_delay_secs = delay;
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = Config::load().context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);

    if !config.has_api_key() {
        warn!("{} is not set; requests will likely be rejected", API_KEY_ENV);
    }

    let source_path = cli.source_path();
    let output_dir = cli.output_dir();

    let source = SourceDocument::load(&source_path)
        .await
        .with_context(|| format!("Failed to read source text {}", source_path.display()))?;

    info!("Source:   {}", source_path.display());
    info!("Output:   {}", output_dir.display());
    info!("Model:    {}", config.model);
    info!("Delay:    {:?}", config.request_delay());

    let client = GeminiClient::new(config.gemini_api_key.clone());
    let runner = BatchRunner::from_config(Box::new(client), &config).with_progress(!cli.no_progress);

    let summary = runner.run(&source, &config.languages, &output_dir).await;
    print_summary(&summary);

    // Per-language failures are reported above and never change the exit code.
    Ok(())
}
