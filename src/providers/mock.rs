/*!
 * Mock provider implementations for testing.
 *
 * This module provides a configurable provider that simulates different
 * behaviors:
 * - `MockProvider::working()` - always succeeds, returning input unchanged
 * - `MockProvider::failing()` - always fails with a provider error
 * - `MockProvider::fail_times(n)` - fails the first n calls, then succeeds
 * - `MockProvider::omitting(ids)` - succeeds but drops the given segment ids
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::document_model::TextSegment;
use crate::errors::ProviderError;

use super::TranslationProvider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, mapping every segment to its own text
    Working,
    /// Always fails with a request error
    Failing,
    /// Fails the first `n` calls, then behaves like `Working`
    FailTimes(usize),
    /// Succeeds but omits the listed segment ids from the mapping
    Omitting(Vec<String>),
}

/// Mock provider for exercising retry, escalation, and reconciliation paths
pub struct MockProvider {
    behavior: MockBehavior,
    call_count: AtomicUsize,
}

impl MockProvider {
    /// Create a mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Mock that always fails with a provider error
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Mock that fails the first `n` calls, then succeeds
    pub fn fail_times(n: usize) -> Self {
        Self::new(MockBehavior::FailTimes(n))
    }

    /// Mock that omits the given segment ids from its responses
    pub fn omitting(ids: Vec<String>) -> Self {
        Self::new(MockBehavior::Omitting(ids))
    }

    /// Number of translate calls made so far
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn identity_mapping(segments: &[TextSegment]) -> HashMap<String, String> {
        segments
            .iter()
            .map(|segment| (segment.segment_id.clone(), segment.text.clone()))
            .collect()
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(
        &self,
        segments: &[TextSegment],
        _source_language: Option<&str>,
        _target_language: &str,
        _model: Option<&str>,
    ) -> Result<HashMap<String, String>, ProviderError> {
        if segments.is_empty() {
            return Ok(HashMap::new());
        }

        let call = self.call_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working => Ok(Self::identity_mapping(segments)),
            MockBehavior::Failing => Err(ProviderError::RequestFailed(
                "mock provider configured to fail".to_string(),
            )),
            MockBehavior::FailTimes(n) => {
                if call < *n {
                    Err(ProviderError::RequestFailed(format!(
                        "mock provider failing call {} of {}",
                        call + 1,
                        n
                    )))
                } else {
                    Ok(Self::identity_mapping(segments))
                }
            }
            MockBehavior::Omitting(ids) => {
                let mut mapping = Self::identity_mapping(segments);
                for id in ids {
                    mapping.remove(id);
                }
                Ok(mapping)
            }
        }
    }
}
