/*!
 * Translation orchestration.
 *
 * The runner drives the whole pipeline for one document: segment the units,
 * pack the batches, call the provider per batch with automatic retry and
 * policy escalation, reconcile results into per-unit buffers, and reinsert
 * fully-translated units. Batches are processed one at a time; a unit is
 * written back only when every one of its segments resolved, so a document
 * is never left partially rewritten within a unit.
 */

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};
use tokio::time::sleep;

use crate::document_model::{SegmentBatch, TextUnit, UnitContent};
use crate::errors::{AppError, ErrorCategory};
use crate::providers::TranslationProvider;

use super::batch::BatchBuilder;
use super::policy::{ErrorPolicy, PolicyAction};
use super::segmenter::Segmenter;
use super::tagging::decode_tagged;

/// Per-unit translation buffers: one optional slot per segment, indexed by
/// segment order. Absent slots mark untranslated segments.
type TranslationBuffers = HashMap<String, Vec<Option<String>>>;

/// Tunable knobs for a translation run.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Target language passed to the provider
    pub target_language: String,

    /// Optional source language hint
    pub source_language: Option<String>,

    /// Provider-specific model override
    pub model: Option<String>,

    /// Character budget for segments and batches
    pub batch_budget: usize,

    /// Automatic retry attempts per batch before escalation
    pub max_retries: u32,

    /// Backoff delays in seconds; the attempt index selects the delay,
    /// clamped to the last entry
    pub retry_backoff_secs: Vec<u64>,
}

impl RunnerOptions {
    /// Options with the default budget and retry schedule.
    pub fn new(target_language: impl Into<String>) -> Self {
        Self {
            target_language: target_language.into(),
            source_language: None,
            model: None,
            batch_budget: 2000,
            max_retries: 3,
            retry_backoff_secs: vec![1, 4, 9],
        }
    }
}

/// Counters produced by a translation run, before the summary is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Units extracted from the document
    pub total_units: usize,

    /// Units fully translated and written back
    pub translated_units: usize,

    /// Units left untouched because a segment, batch, or setter failed
    pub skipped_units: usize,

    /// Segments produced by the segmenter
    pub total_segments: usize,

    /// Batches sent (or attempted) against the provider
    pub total_batches: usize,
}

/// Report returned after processing a document.
#[derive(Debug, Clone)]
pub struct TranslationSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub document_type: String,
    pub total_units: usize,
    pub translated_units: usize,
    pub skipped_units: usize,
    pub total_segments: usize,
    pub total_batches: usize,
    pub total_errors: usize,
    pub provider_name: String,
    pub model: Option<String>,
    pub target_language: String,
    pub source_language: Option<String>,
    pub elapsed_seconds: f64,
    pub error_messages: Vec<String>,
}

/// Coordinates segmentation, batching, translation, and reinsertion.
pub struct TranslationRunner {
    options: RunnerOptions,
    policy: ErrorPolicy,
    progress: Option<Box<dyn Fn(usize, usize) + Send>>,
}

impl TranslationRunner {
    /// Create a runner with the given options and error policy.
    pub fn new(options: RunnerOptions, policy: ErrorPolicy) -> Self {
        Self {
            options,
            policy,
            progress: None,
        }
    }

    /// Install a progress callback invoked as `(batches_done, batches_total)`.
    pub fn with_progress(mut self, callback: impl Fn(usize, usize) + Send + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// The error policy, for summary extraction after a run.
    pub fn policy(&self) -> &ErrorPolicy {
        &self.policy
    }

    /// Translate the given units in place through the provider.
    ///
    /// On success every fully-resolved unit has been written back through
    /// its sink; partially-resolved units are counted skipped and left
    /// untouched. Returns an error only for abort decisions and the
    /// non-interactive hard stop, in which case the caller must not persist
    /// the document.
    pub async fn translate_units(
        &mut self,
        units: &mut [TextUnit],
        provider: &dyn TranslationProvider,
    ) -> Result<RunStats, AppError> {
        let segmenter = Segmenter::new(self.options.batch_budget);
        let segments = segmenter.segment_units(units);
        let total_segments = segments.len();

        let batches = BatchBuilder::new(self.options.batch_budget).build(segments);
        let total_batches = batches.len();
        debug!(
            "Prepared {} text units, {} segments, {} batches",
            units.len(),
            total_segments,
            total_batches
        );

        let mut buffers: TranslationBuffers = units
            .iter()
            .filter(|unit| !unit.segments.is_empty())
            .map(|unit| (unit.unit_id.clone(), vec![None; unit.segments.len()]))
            .collect();

        for (done, batch) in batches.iter().enumerate() {
            self.process_batch(provider, batch, &mut buffers).await?;
            if let Some(callback) = &self.progress {
                callback(done + 1, total_batches);
            }
        }

        let mut translated_units = 0;
        let mut skipped_units = 0;
        for unit in units.iter() {
            let Some(buffer) = buffers.get(&unit.unit_id) else {
                // No segments: excluded from translation and reinsertion.
                continue;
            };

            if buffer.iter().any(Option::is_none) {
                skipped_units += 1;
                continue;
            }

            let translated: String = buffer.iter().flatten().map(String::as_str).collect();
            if self.reinsert_unit(unit, &translated)? {
                translated_units += 1;
            } else {
                skipped_units += 1;
            }
        }

        Ok(RunStats {
            total_units: units.len(),
            translated_units,
            skipped_units,
            total_segments,
            total_batches,
        })
    }

    /// Send one batch, absorbing transient failures with the fixed retry
    /// schedule and escalating exhausted retries through the error policy.
    async fn process_batch(
        &mut self,
        provider: &dyn TranslationProvider,
        batch: &SegmentBatch,
        buffers: &mut TranslationBuffers,
    ) -> Result<(), AppError> {
        let mut attempt: u32 = 0;
        loop {
            let result = provider
                .translate(
                    &batch.segments,
                    self.options.source_language.as_deref(),
                    &self.options.target_language,
                    self.options.model.as_deref(),
                )
                .await;

            let err = match result {
                Ok(mapping) => {
                    self.reconcile(batch, &mapping, buffers)?;
                    debug!(
                        "Processed batch {} ({} segments, {} chars)",
                        batch.batch_id,
                        batch.segments.len(),
                        batch.char_len()
                    );
                    return Ok(());
                }
                Err(err) => err,
            };

            attempt += 1;
            if attempt <= self.options.max_retries {
                let schedule = &self.options.retry_backoff_secs;
                let index = ((attempt - 1) as usize).min(schedule.len().saturating_sub(1));
                let wait = schedule.get(index).copied().unwrap_or(0);
                warn!(
                    "Could not translate batch {} (attempt {} of {} - {}). Retrying automatically...",
                    batch.batch_id, attempt, self.options.max_retries, err
                );
                if wait > 0 {
                    sleep(Duration::from_secs(wait)).await;
                }
                continue;
            }

            let action = self.policy.handle_error(
                ErrorCategory::Translation,
                format!(
                    "Batch {} failed after multiple attempts. {}",
                    batch.batch_id, err
                ),
                None,
            )?;
            if action == PolicyAction::Retry {
                attempt = 0;
                continue;
            }

            // Abandon this batch; its buffer slots stay absent.
            debug!("Skipping batch {} after repeated failures", batch.batch_id);
            return Ok(());
        }
    }

    /// Copy a provider mapping into the buffers, reporting each omitted
    /// segment. A success is recorded only when nothing was missing.
    fn reconcile(
        &mut self,
        batch: &SegmentBatch,
        mapping: &HashMap<String, String>,
        buffers: &mut TranslationBuffers,
    ) -> Result<(), AppError> {
        let mut missing = false;

        for segment in &batch.segments {
            let Some(translated) = mapping.get(&segment.segment_id) else {
                missing = true;
                self.policy.handle_error(
                    ErrorCategory::Translation,
                    format!(
                        "Translation missing for segment {}. Skipping this element.",
                        segment.segment_id
                    ),
                    None,
                )?;
                continue;
            };

            let Some(buffer) = buffers.get_mut(&segment.unit_id) else {
                self.policy.handle_error(
                    ErrorCategory::Reinsertion,
                    format!("Unexpected segment reference {}.", segment.segment_id),
                    None,
                )?;
                continue;
            };
            if segment.order < buffer.len() {
                buffer[segment.order] = Some(translated.clone());
            }
        }

        if !missing {
            self.policy.record_success();
        }
        Ok(())
    }

    /// Write one fully-translated unit back through its sink(s).
    ///
    /// Returns whether the unit was applied. Tagged payloads that fail to
    /// decode are skipped under a format error; sink failures are retried
    /// exactly once before the unit is given up.
    fn reinsert_unit(&mut self, unit: &TextUnit, translated: &str) -> Result<bool, AppError> {
        match &unit.content {
            UnitContent::Plain { sink } => {
                self.apply_with_retry(&unit.location, || sink.apply(translated))
            }
            UnitContent::Tagged { fragments } => {
                let expected: Vec<String> = fragments
                    .iter()
                    .map(|fragment| fragment.fragment_id.clone())
                    .collect();
                let mapping = match decode_tagged(translated, &expected) {
                    Ok(mapping) => mapping,
                    Err(err) => {
                        self.policy.handle_error(
                            ErrorCategory::Format,
                            format!(
                                "Could not decode translated runs at {}. Skipping this element. ({})",
                                unit.location, err
                            ),
                            None,
                        )?;
                        return Ok(false);
                    }
                };

                self.apply_with_retry(&unit.location, || {
                    for fragment in fragments {
                        if let Some(text) = mapping.get(&fragment.fragment_id) {
                            fragment.sink.apply(text)?;
                        }
                    }
                    Ok(())
                })
            }
        }
    }

    /// Apply a reinsertion closure, retrying once after a reported failure.
    fn apply_with_retry(
        &mut self,
        location: &str,
        apply: impl Fn() -> anyhow::Result<()>,
    ) -> Result<bool, AppError> {
        match apply() {
            Ok(()) => {
                self.policy.record_success();
                return Ok(true);
            }
            Err(err) => {
                self.policy.handle_error(
                    ErrorCategory::Reinsertion,
                    format!(
                        "Could not reinsert translated text at {}. Retrying once. ({})",
                        location, err
                    ),
                    None,
                )?;
            }
        }

        match apply() {
            Ok(()) => {
                self.policy.record_success();
                Ok(true)
            }
            Err(err) => {
                self.policy.handle_error(
                    ErrorCategory::Reinsertion,
                    format!(
                        "Reinsertion retry failed at {}. Skipping this element. ({})",
                        location, err
                    ),
                    None,
                )?;
                Ok(false)
            }
        }
    }
}
