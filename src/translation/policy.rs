/*!
 * Categorized error policy.
 *
 * A bounded state machine that tracks consecutive failures of one category
 * and total failures over the run, and decides whether processing continues,
 * retries, or stops. Interactive escalation is abstracted behind the
 * [`DecisionProvider`] trait so headless runs and tests can supply fixed
 * answers without simulating terminal input.
 */

use std::io::{BufRead, Write};

use log::warn;

use crate::errors::{AppError, ErrorCategory};

/// Stores context for a handled error.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    /// Category the caller assigned at the call site
    pub category: ErrorCategory,

    /// User-facing message
    pub message: String,

    /// Optional technical detail
    pub details: Option<String>,
}

/// Tracks consecutive and aggregate errors against the policy thresholds.
#[derive(Debug, Default)]
pub struct ErrorTracker {
    last_category: Option<ErrorCategory>,
    consecutive: usize,
    total: usize,
}

impl ErrorTracker {
    /// Consecutive same-category failures that trigger escalation.
    pub const CONSECUTIVE_LIMIT: usize = 3;

    /// Lifetime failure count that triggers escalation.
    pub const TOTAL_LIMIT: usize = 10;

    /// Register a new error and return `(consecutive, total, threshold_reached)`.
    pub fn register(&mut self, category: ErrorCategory) -> (usize, usize, bool) {
        if self.last_category == Some(category) {
            self.consecutive += 1;
        } else {
            self.last_category = Some(category);
            self.consecutive = 1;
        }

        self.total += 1;

        let threshold_reached =
            self.consecutive >= Self::CONSECUTIVE_LIMIT || self.total >= Self::TOTAL_LIMIT;

        (self.consecutive, self.total, threshold_reached)
    }

    /// Reset the consecutive counter after successful work. The total is a
    /// lifetime counter and is never reset.
    pub fn reset_consecutive(&mut self) {
        self.consecutive = 0;
        self.last_category = None;
    }
}

/// Answer to an escalation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Resume without resetting counters
    Continue,
    /// Redo the failed operation
    Retry,
    /// Stop the run entirely
    Abort,
}

/// Source of escalation decisions.
///
/// The console implementation blocks on stdin; tests and headless callers
/// supply scripted answers.
pub trait DecisionProvider: Send {
    /// Resolve the prompt to a decision.
    fn resolve(&mut self, prompt: &str) -> Decision;
}

/// Interactive decision provider reading from the terminal.
///
/// Loops until the user answers continue, retry, or abort (or EOF, which is
/// taken as abort).
#[derive(Debug, Default)]
pub struct ConsoleDecisionProvider;

impl DecisionProvider for ConsoleDecisionProvider {
    fn resolve(&mut self, prompt: &str) -> Decision {
        let stdin = std::io::stdin();
        loop {
            eprint!("{} ", prompt);
            let _ = std::io::stderr().flush();

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return Decision::Abort,
                Ok(_) => {}
            }

            match line.trim().to_lowercase().as_str() {
                "continue" | "c" => return Decision::Continue,
                "retry" | "r" => return Decision::Retry,
                "abort" | "a" => return Decision::Abort,
                _ => eprintln!("Please respond with Continue, Retry, or Abort (c/r/a)."),
            }
        }
    }
}

/// Non-abort outcome of handling an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    /// Keep going, the failed work is abandoned
    Continue,
    /// The caller should redo the failed operation
    Retry,
}

/// The resilient error policy: record, count, escalate.
pub struct ErrorPolicy {
    decisions: Option<Box<dyn DecisionProvider>>,
    tracker: ErrorTracker,
    records: Vec<ErrorRecord>,
}

impl ErrorPolicy {
    /// Policy that escalates to the given decision provider at thresholds.
    pub fn interactive(decisions: Box<dyn DecisionProvider>) -> Self {
        Self {
            decisions: Some(decisions),
            tracker: ErrorTracker::default(),
            records: Vec::new(),
        }
    }

    /// Policy that stops the run at thresholds; no prompt is possible.
    pub fn non_interactive() -> Self {
        Self {
            decisions: None,
            tracker: ErrorTracker::default(),
            records: Vec::new(),
        }
    }

    /// Reset the consecutive counter after successful work.
    pub fn record_success(&mut self) {
        self.tracker.reset_consecutive();
    }

    /// Handle an error: log it, record it, and decide what happens next.
    ///
    /// Below threshold this always returns [`PolicyAction::Continue`]. At
    /// threshold the decision provider is consulted; an abort answer (or a
    /// non-interactive policy) becomes an error that propagates to the top
    /// level.
    pub fn handle_error(
        &mut self,
        category: ErrorCategory,
        message: impl Into<String>,
        details: Option<String>,
    ) -> Result<PolicyAction, AppError> {
        let message = message.into();
        warn!("{}", message);

        self.records.push(ErrorRecord {
            category,
            message,
            details,
        });

        let (consecutive, _total, threshold_reached) = self.tracker.register(category);
        if !threshold_reached {
            return Ok(PolicyAction::Continue);
        }

        let prompt = if consecutive >= ErrorTracker::CONSECUTIVE_LIMIT {
            "Repeated errors detected (3 times). Continue, retry, or abort?"
        } else {
            "More than 10 errors encountered. Continue, retry, or abort?"
        };

        let Some(decisions) = self.decisions.as_mut() else {
            return Err(AppError::NonInteractiveAbort);
        };

        match decisions.resolve(prompt) {
            Decision::Continue => Ok(PolicyAction::Continue),
            Decision::Retry => Ok(PolicyAction::Retry),
            Decision::Abort => Err(AppError::Aborted),
        }
    }

    /// All handled errors, in registration order.
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// Number of errors accumulated over the run.
    pub fn total_errors(&self) -> usize {
        self.records.len()
    }

    /// The accumulated error messages, for the run summary.
    pub fn error_messages(&self) -> Vec<String> {
        self.records.iter().map(|r| r.message.clone()).collect()
    }
}
