/*!
 * The document translation pipeline.
 *
 * This module contains the core of the system, split into several
 * submodules:
 *
 * - `segmenter`: budget-aware splitting of unit text into segments
 * - `batch`: greedy packing of segments into provider batches
 * - `tagging`: the `<run id="...">` multi-fragment wire codec
 * - `policy`: the categorized error policy state machine
 * - `runner`: orchestration of segment, batch, translate, and reinsert
 */

// Re-export main types for easier usage
pub use self::batch::BatchBuilder;
pub use self::policy::{
    ConsoleDecisionProvider, Decision, DecisionProvider, ErrorPolicy, ErrorRecord, ErrorTracker,
    PolicyAction,
};
pub use self::runner::{RunStats, RunnerOptions, TranslationRunner, TranslationSummary};
pub use self::segmenter::Segmenter;

// Submodules
pub mod batch;
pub mod policy;
pub mod runner;
pub mod segmenter;
pub mod tagging;
