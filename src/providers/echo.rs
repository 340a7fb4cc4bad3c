/*!
 * Identity provider returning its input unchanged.
 *
 * The canonical test double: a full pipeline run through the echo provider
 * must reproduce the source document byte for byte.
 */

use std::collections::HashMap;

use async_trait::async_trait;

use crate::document_model::TextSegment;
use crate::errors::ProviderError;

use super::TranslationProvider;

/// A provider that returns the original text, useful for testing.
#[derive(Debug, Default)]
pub struct EchoProvider;

#[async_trait]
impl TranslationProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn translate(
        &self,
        segments: &[TextSegment],
        _source_language: Option<&str>,
        _target_language: &str,
        _model: Option<&str>,
    ) -> Result<HashMap<String, String>, ProviderError> {
        Ok(segments
            .iter()
            .map(|segment| (segment.segment_id.clone(), segment.text.clone()))
            .collect())
    }
}
