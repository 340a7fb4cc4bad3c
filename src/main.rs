// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};

use doctran::app_config::{Config, LogLevel, ProviderKind};
use doctran::app_controller::{Controller, validate_paths};
use doctran::errors::AppError;
use doctran::language_utils;
use doctran::translation::TranslationSummary;

/// CLI wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    OpenAI,
    Anthropic,
    Echo,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::OpenAI => ProviderKind::OpenAI,
            CliProvider::Anthropic => ProviderKind::Anthropic,
            CliProvider::Echo => ProviderKind::Echo,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a document while preserving its structure (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Generate shell completions for doctran
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Path to the document to translate
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Destination language (name or ISO-639 code)
    #[arg(short = 't', long)]
    target_language: String,

    /// Optional source language hint (name or ISO-639 code)
    #[arg(short = 's', long)]
    source_language: Option<String>,

    /// Output file path. Defaults to appending the target language code
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short = 'p', long, value_enum)]
    provider: Option<CliProvider>,

    /// Provider-specific model or engine identifier
    #[arg(short = 'm', long)]
    model: Option<String>,

    /// Approximate maximum characters per translation batch
    #[arg(short = 'b', long)]
    batch_guidance: Option<usize>,

    /// Allow overwriting the output file if it already exists
    #[arg(short = 'f', long)]
    force: bool,

    /// Disable prompts and enforce automatic decisions (suitable for CI)
    #[arg(long)]
    non_interactive: bool,

    /// Configuration file path
    #[arg(short = 'c', long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short = 'l', long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// doctran - document translation with AI
///
/// Translates documents while preserving formatting runs, tables, and
/// every other structural element, using configurable AI providers.
#[derive(Parser, Debug)]
#[command(name = "doctran")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered structure-preserving document translation")]
#[command(long_about = "doctran translates the textual content of documents while preserving \
every non-text structural element.

EXAMPLES:
    doctran report.txt -t fr                   # Translate to French
    doctran report.txt -t ja -o report_ja.txt  # Explicit output path
    doctran report.txt -t es -p anthropic      # Use a specific provider
    doctran report.txt -t de -m gpt-4o         # Use a specific model
    doctran report.txt -t fr --non-interactive # No prompts, CI friendly
    doctran completions bash > doctran.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different file with --config-path. If the config file doesn't exist, a
    default one will be created automatically. API keys may also come from
    the OPENAI_API_KEY and ANTHROPIC_API_KEY environment variables.

SUPPORTED PROVIDERS:
    openai    - OpenAI API (requires API key)
    anthropic - Anthropic Claude API (requires API key)
    echo      - Returns text unchanged (for testing)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the document to translate
    #[arg(value_name = "INPUT_FILE")]
    input_file: Option<PathBuf>,

    /// Destination language (name or ISO-639 code)
    #[arg(short = 't', long)]
    target_language: Option<String>,

    /// Optional source language hint (name or ISO-639 code)
    #[arg(short = 's', long)]
    source_language: Option<String>,

    /// Output file path. Defaults to appending the target language code
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short = 'p', long, value_enum)]
    provider: Option<CliProvider>,

    /// Provider-specific model or engine identifier
    #[arg(short = 'm', long)]
    model: Option<String>,

    /// Approximate maximum characters per translation batch
    #[arg(short = 'b', long)]
    batch_guidance: Option<usize>,

    /// Allow overwriting the output file if it already exists
    #[arg(short = 'f', long)]
    force: bool,

    /// Disable prompts and enforce automatic decisions (suitable for CI)
    #[arg(long)]
    non_interactive: bool,

    /// Configuration file path
    #[arg(short = 'c', long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short = 'l', long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default; the level is
    // updated after the config is loaded.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "doctran", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_file = cli
                .input_file
                .ok_or_else(|| anyhow!("INPUT_FILE is required when no subcommand is specified"))?;
            let target_language = cli.target_language.ok_or_else(|| {
                anyhow!("--target-language is required when no subcommand is specified")
            })?;

            let translate_args = TranslateArgs {
                input_file,
                target_language,
                source_language: cli.source_language,
                output: cli.output,
                provider: cli.provider,
                model: cli.model,
                batch_guidance: cli.batch_guidance,
                force: cli.force,
                non_interactive: cli.non_interactive,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        // Find the provider config entry and update the model
        let provider_str = config.translation.provider.to_lowercase_string();
        if let Some(provider_config) = config
            .translation
            .available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
        {
            provider_config.model = model.clone();
        }
    }

    if let Some(source_language) = &options.source_language {
        config.source_language = Some(source_language.clone());
    }

    config.target_language = Some(options.target_language.clone());

    if let Some(batch_guidance) = options.batch_guidance {
        config.translation.batch_budget = batch_guidance;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    // Resolve input and output paths
    let input_path = options.input_file.clone();
    let output_path = options
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(&input_path, &options.target_language));

    if let Err(e) = validate_paths(&input_path, &output_path, options.force) {
        error!("{}", e);
        std::process::exit(1);
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Run the translation
    let controller = Controller::with_config(config)?;
    match controller
        .run(input_path, output_path, !options.non_interactive)
        .await
    {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(AppError::Aborted) => {
            error!("Translation aborted at your request.");
            std::process::exit(2);
        }
        Err(AppError::NonInteractiveAbort) => {
            error!("Error threshold exceeded in non-interactive mode. Stopping safely.");
            std::process::exit(2);
        }
        Err(e) => Err(anyhow!(e)),
    }
}

/// Default output path: append a language suffix before the extension.
fn derive_output_path(input_path: &Path, target_language: &str) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix = language_utils::filename_suffix(target_language);
    let candidate = match input_path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    input_path.with_file_name(candidate)
}

/// Output a friendly report once processing completes.
fn print_summary(summary: &TranslationSummary) {
    info!("Translation complete.");
    info!("  Input file:      {:?}", summary.input_path);
    info!("  Output file:     {:?}", summary.output_path);
    info!("  Document type:   {}", summary.document_type);
    info!(
        "  Text units:      {} translated / {} total ({} skipped)",
        summary.translated_units, summary.total_units, summary.skipped_units
    );
    info!(
        "  Segments:        {} in {} batches",
        summary.total_segments, summary.total_batches
    );
    match &summary.model {
        Some(model) => info!("  Provider:        {} ({})", summary.provider_name, model),
        None => info!("  Provider:        {}", summary.provider_name),
    }
    if let Some(source_language) = &summary.source_language {
        info!("  Source language: {}", source_language);
    }
    info!("  Target language: {}", summary.target_language);
    info!("  Elapsed time:    {:.2} seconds", summary.elapsed_seconds);
    if summary.total_errors > 0 {
        info!("  Notes:");
        for message in &summary.error_messages {
            info!("    - {}", message);
        }
    }
}
