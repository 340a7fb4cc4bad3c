/*!
 * In-memory document of paragraphs made of runs.
 *
 * Stands in for a real container format in tests and exercises the tagged
 * multi-run path end to end: paragraphs with several runs become atomic
 * tagged units, single-run paragraphs become plain units.
 */

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use parking_lot::Mutex;

use crate::document_model::{TextSink, TextUnit};

use super::{DocumentHandler, unit_from_runs};

/// Shared paragraph/run store the sinks write into.
type RunStore = Arc<Mutex<Vec<Vec<String>>>>;

/// Write-back handle for one run of one paragraph.
struct RunSink {
    runs: RunStore,
    paragraph: usize,
    run: usize,
}

impl TextSink for RunSink {
    fn apply(&self, text: &str) -> Result<()> {
        let mut runs = self.runs.lock();
        let slot = runs
            .get_mut(self.paragraph)
            .and_then(|paragraph| paragraph.get_mut(self.run))
            .ok_or_else(|| anyhow!("run {}/{} no longer exists", self.paragraph, self.run))?;
        *slot = text.to_string();
        Ok(())
    }
}

/// A document held entirely in memory.
pub struct MemoryDocument {
    runs: RunStore,
}

impl MemoryDocument {
    /// Build a document from paragraphs of runs.
    pub fn new<S: Into<String>>(paragraphs: Vec<Vec<S>>) -> Self {
        let runs = paragraphs
            .into_iter()
            .map(|paragraph| paragraph.into_iter().map(Into::into).collect())
            .collect();
        Self {
            runs: Arc::new(Mutex::new(runs)),
        }
    }

    /// Current text of one run.
    pub fn run_text(&self, paragraph: usize, run: usize) -> Option<String> {
        self.runs
            .lock()
            .get(paragraph)
            .and_then(|p| p.get(run))
            .cloned()
    }

    /// Current text of one paragraph, runs concatenated in order.
    pub fn paragraph_text(&self, paragraph: usize) -> String {
        self.runs
            .lock()
            .get(paragraph)
            .map(|p| p.concat())
            .unwrap_or_default()
    }
}

impl DocumentHandler for MemoryDocument {
    fn extract_text_units(&mut self) -> Result<Vec<TextUnit>> {
        let snapshot = self.runs.lock().clone();
        let mut units = Vec::new();
        for (p_idx, paragraph) in snapshot.into_iter().enumerate() {
            let runs: Vec<(String, Box<dyn TextSink>)> = paragraph
                .into_iter()
                .enumerate()
                .map(|(r_idx, text)| {
                    let sink: Box<dyn TextSink> = Box::new(RunSink {
                        runs: Arc::clone(&self.runs),
                        paragraph: p_idx,
                        run: r_idx,
                    });
                    (text, sink)
                })
                .collect();
            if let Some(unit) = unit_from_runs(
                &format!("p{}", p_idx),
                &format!("Paragraph {}", p_idx + 1),
                runs,
            ) {
                units.push(unit);
            }
        }
        Ok(units)
    }

    fn save(&self, _destination: &Path) -> Result<()> {
        // Nothing to persist; the store is the document.
        Ok(())
    }
}
