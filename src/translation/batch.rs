/*!
 * Batch construction for provider calls.
 *
 * Greedily packs segments into batches bounded by the character budget so
 * that one provider round-trip covers as much text as possible.
 */

use crate::document_model::{SegmentBatch, TextSegment};

/// Aggregates segments into batches within a character budget.
pub struct BatchBuilder {
    budget: usize,
}

impl BatchBuilder {
    /// Create a builder for the given character budget. A budget of zero is
    /// treated as 1.
    pub fn new(budget: usize) -> Self {
        Self {
            budget: budget.max(1),
        }
    }

    /// Pack segments into batches, preserving input order.
    ///
    /// A segment longer than the budget flushes the open batch and is
    /// emitted alone; the over-budget singleton is accepted rather than
    /// splitting content the segmenter already declared indivisible.
    /// Batch ids are assigned sequentially from 1.
    pub fn build(&self, segments: Vec<TextSegment>) -> Vec<SegmentBatch> {
        let mut batches = Vec::new();
        let mut open: Vec<TextSegment> = Vec::new();
        let mut running_total = 0;
        let mut batch_id = 1;

        for segment in segments {
            let size = segment.char_len();
            if size > self.budget {
                if !open.is_empty() {
                    batches.push(SegmentBatch {
                        batch_id,
                        segments: std::mem::take(&mut open),
                    });
                    batch_id += 1;
                    running_total = 0;
                }
                batches.push(SegmentBatch {
                    batch_id,
                    segments: vec![segment],
                });
                batch_id += 1;
                continue;
            }

            if running_total + size > self.budget && !open.is_empty() {
                batches.push(SegmentBatch {
                    batch_id,
                    segments: std::mem::take(&mut open),
                });
                batch_id += 1;
                running_total = 0;
            }

            open.push(segment);
            running_total += size;
        }

        if !open.is_empty() {
            batches.push(SegmentBatch {
                batch_id,
                segments: open,
            });
        }

        batches
    }
}
