/*!
 * Plain-text document handler.
 *
 * Treats each non-blank line as one translation unit and preserves the
 * file's line structure (blank lines included) byte for byte on save.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use parking_lot::Mutex;

use crate::document_model::{TextSink, TextUnit};

use super::DocumentHandler;

/// Shared line store the sinks write into.
type LineStore = Arc<Mutex<Vec<String>>>;

/// Write-back handle for one line.
struct LineSink {
    lines: LineStore,
    index: usize,
}

impl TextSink for LineSink {
    fn apply(&self, text: &str) -> Result<()> {
        let mut lines = self.lines.lock();
        let slot = lines
            .get_mut(self.index)
            .ok_or_else(|| anyhow!("line {} no longer exists", self.index))?;
        *slot = text.to_string();
        Ok(())
    }
}

/// Extracts and reinserts text for plain-text files.
pub struct PlainTextHandler {
    source_path: PathBuf,
    lines: LineStore,
}

impl PlainTextHandler {
    /// Read the file and split it into lines.
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {:?}", path))?;
        let lines: Vec<String> = content.split('\n').map(str::to_string).collect();
        Ok(Self {
            source_path: path.to_path_buf(),
            lines: Arc::new(Mutex::new(lines)),
        })
    }

    /// The path the document was opened from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

impl DocumentHandler for PlainTextHandler {
    fn extract_text_units(&mut self) -> Result<Vec<TextUnit>> {
        let lines = self.lines.lock();
        let mut units = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            units.push(TextUnit::plain(
                format!("line{}", idx),
                line.clone(),
                format!("Line {}", idx + 1),
                Box::new(LineSink {
                    lines: Arc::clone(&self.lines),
                    index: idx,
                }),
            ));
        }
        Ok(units)
    }

    fn save(&self, destination: &Path) -> Result<()> {
        let content = self.lines.lock().join("\n");
        std::fs::write(destination, content)
            .with_context(|| format!("Failed to write output file: {:?}", destination))?;
        Ok(())
    }
}
