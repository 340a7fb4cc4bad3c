/*!
 * # doctran - document translation with AI
 *
 * A Rust library for translating the textual content of structured
 * documents while preserving every non-text structural element.
 *
 * ## Features
 *
 * - Budget-aware segmentation along sentence, clause, and token boundaries
 * - Greedy batching of segments to minimize provider round-trips
 * - Run-tagging codec so multi-run sentences translate as one payload while
 *   every run stays individually reinsertable
 * - Per-batch automatic retry with a categorized error policy deciding
 *   continue/retry/abort at failure thresholds
 * - All-or-nothing reinsertion per unit: a document is saved consistent,
 *   never half-rewritten inside a unit
 * - Swappable providers (OpenAI, Anthropic, echo) behind one async trait
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document_model`: Units, segments, batches, and the sink trait
 * - `documents`: Document handler boundary and concrete handlers
 * - `translation`: The pipeline core:
 *   - `translation::segmenter`: Budget-aware text splitting
 *   - `translation::batch`: Segment batching
 *   - `translation::tagging`: The `<run id="...">` wire codec
 *   - `translation::policy`: The error policy state machine
 *   - `translation::runner`: Orchestration
 * - `providers`: Client implementations for translation backends
 * - `language_utils`: ISO language code utilities
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document_model;
pub mod documents;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use document_model::{SegmentBatch, TextSegment, TextSink, TextUnit, UnitContent};
pub use errors::{AppError, ErrorCategory, ProviderError};
pub use translation::{BatchBuilder, ErrorPolicy, Segmenter, TranslationRunner};
