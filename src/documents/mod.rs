/*!
 * Document handler boundary.
 *
 * A handler parses one container format into an ordered list of text units
 * and persists the mutated document afterwards. The core never touches a
 * document library directly; it only sees units and sinks.
 */

use std::path::Path;

use anyhow::Result;

use crate::document_model::{TaggedFragment, TextSink, TextUnit};
use crate::errors::AppError;
use crate::translation::tagging::encode_fragments;

pub mod memory;
pub mod plain_text;

/// Format-specific extraction and persistence for one document.
pub trait DocumentHandler {
    /// Extract translation-ready text units in document order.
    fn extract_text_units(&mut self) -> Result<Vec<TextUnit>>;

    /// Persist the (possibly partially) translated document.
    fn save(&self, destination: &Path) -> Result<()>;
}

/// Select an appropriate handler for the provided file.
///
/// Returns the document type label alongside the handler. Unknown
/// extensions are a fatal format error, raised before any work starts.
pub fn detect_handler(path: &Path) -> Result<(String, Box<dyn DocumentHandler>), AppError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => {
            let handler = plain_text::PlainTextHandler::open(path)
                .map_err(|e| AppError::File(e.to_string()))?;
            Ok(("txt".to_string(), Box::new(handler)))
        }
        _ => Err(AppError::UnsupportedFormat(format!(
            "This file type is not supported: {:?}. Please provide a .txt file.",
            path
        ))),
    }
}

/// Aggregate one paragraph's runs into a single translation unit.
///
/// Runs are given in paragraph order, empty ones included so fragment ids
/// keep their structural index. Empty and whitespace-only runs are dropped.
/// A single surviving run becomes a plain unit and bypasses tagging;
/// several become one tagged atomic unit whose fragments are translated
/// together and reinserted individually.
pub fn unit_from_runs(
    unit_prefix: &str,
    location: &str,
    runs: Vec<(String, Box<dyn TextSink>)>,
) -> Option<TextUnit> {
    let mut fragments: Vec<(usize, String, Box<dyn TextSink>)> = Vec::new();
    for (r_idx, (text, sink)) in runs.into_iter().enumerate() {
        if text.trim().is_empty() {
            continue;
        }
        fragments.push((r_idx, text, sink));
    }

    if fragments.is_empty() {
        return None;
    }

    if fragments.len() == 1 {
        let (r_idx, text, sink) = fragments.remove(0);
        let fragment_id = format!("{}.r{}", unit_prefix, r_idx);
        return Some(TextUnit::plain(fragment_id, text, location, sink));
    }

    let pairs: Vec<(String, String)> = fragments
        .iter()
        .map(|(r_idx, text, _)| (format!("{}.r{}", unit_prefix, r_idx), text.clone()))
        .collect();
    let encoded = encode_fragments(&pairs);

    let tagged: Vec<TaggedFragment> = fragments
        .into_iter()
        .map(|(r_idx, _, sink)| TaggedFragment {
            fragment_id: format!("{}.r{}", unit_prefix, r_idx),
            sink,
        })
        .collect();

    Some(TextUnit::tagged(unit_prefix, encoded, location, tagged))
}
