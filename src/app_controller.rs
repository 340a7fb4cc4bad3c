use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use crate::app_config::{Config, ProviderKind};
use crate::documents::detect_handler;
use crate::errors::AppError;
use crate::language_utils;
use crate::providers::build_provider;
use crate::translation::{
    ConsoleDecisionProvider, ErrorPolicy, RunnerOptions, TranslationRunner, TranslationSummary,
};

// Main application controller for document translation

/// Drives the translation of one document from input path to output path.
pub struct Controller {
    config: Config,
}

impl Controller {
    /// Create a new controller with the given configuration
    pub fn with_config(config: Config) -> anyhow::Result<Self> {
        Ok(Self { config })
    }

    /// Run the full workflow: extract, translate, reinsert, save.
    ///
    /// An abort decision or the non-interactive hard stop propagates as an
    /// error before the output document is written.
    pub async fn run(
        &self,
        input_path: PathBuf,
        output_path: PathBuf,
        interactive: bool,
    ) -> Result<TranslationSummary, AppError> {
        let start_time = Instant::now();

        let target_language = self
            .config
            .target_language
            .clone()
            .filter(|language| !language.trim().is_empty())
            .ok_or_else(|| AppError::Argument("A target language is required.".to_string()))?;
        let source_language = self
            .config
            .source_language
            .clone()
            .filter(|language| !language.trim().is_empty());

        let (document_type, mut handler) = detect_handler(&input_path)?;
        let mut units = handler
            .extract_text_units()
            .map_err(|e| AppError::File(e.to_string()))?;
        debug!("Extracted {} text units from {:?}", units.len(), input_path);

        let kind = self.config.translation.provider.clone();
        let provider = build_provider(None, &self.config)?;
        let model = match kind {
            ProviderKind::Echo => None,
            _ => Some(self.config.get_model(&kind)),
        };

        let policy = if interactive {
            ErrorPolicy::interactive(Box::new(ConsoleDecisionProvider))
        } else {
            ErrorPolicy::non_interactive()
        };

        let options = RunnerOptions {
            target_language: language_utils::display_name(&target_language),
            source_language: source_language
                .as_deref()
                .map(language_utils::display_name),
            model: model.clone(),
            batch_budget: self.config.translation.batch_budget,
            max_retries: self.config.translation.retry_count,
            retry_backoff_secs: self.config.translation.retry_backoff_secs.clone(),
        };

        let progress = ProgressBar::new(0).with_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} batches")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        let progress_handle = progress.clone();

        let mut runner =
            TranslationRunner::new(options, policy).with_progress(move |done, total| {
                if progress_handle.length() != Some(total as u64) {
                    progress_handle.set_length(total as u64);
                }
                progress_handle.set_position(done as u64);
            });

        let stats = runner
            .translate_units(&mut units, provider.as_ref())
            .await?;
        progress.finish_and_clear();

        handler
            .save(&output_path)
            .map_err(|e| AppError::File(e.to_string()))?;

        Ok(TranslationSummary {
            input_path,
            output_path,
            document_type,
            total_units: stats.total_units,
            translated_units: stats.translated_units,
            skipped_units: stats.skipped_units,
            total_segments: stats.total_segments,
            total_batches: stats.total_batches,
            total_errors: runner.policy().total_errors(),
            provider_name: provider.name().to_string(),
            model,
            target_language,
            source_language,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
            error_messages: runner.policy().error_messages(),
        })
    }
}

/// Validate input/output path combinations and the overwrite policy.
///
/// All checks run before any document is opened or mutated.
pub fn validate_paths(
    input_path: &Path,
    output_path: &Path,
    force_overwrite: bool,
) -> Result<(), AppError> {
    if !input_path.exists() {
        return Err(AppError::File(
            "Input file not found. Please provide a readable document.".to_string(),
        ));
    }
    if !input_path.is_file() {
        return Err(AppError::Argument("Input path must be a file.".to_string()));
    }

    let same_file = match (input_path.canonicalize(), output_path.canonicalize()) {
        (Ok(input), Ok(output)) => input == output,
        _ => input_path == output_path,
    };
    if same_file {
        return Err(AppError::OverwriteRefused(
            "The output path matches the input document. Refusing to overwrite the source file."
                .to_string(),
        ));
    }

    if output_path.exists() && !force_overwrite {
        return Err(AppError::OverwriteRefused(
            "The output file already exists. Rename it or pass the overwrite flag.".to_string(),
        ));
    }

    Ok(())
}
