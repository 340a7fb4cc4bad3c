/*!
 * Core data model shared by every stage of the translation pipeline.
 *
 * A document handler turns a document into an ordered list of [`TextUnit`]s,
 * the segmenter slices each unit into [`TextSegment`]s, and the batch builder
 * packs segments into [`SegmentBatch`]es for the provider. Reinsertion flows
 * back through each unit's [`TextSink`].
 */

use anyhow::Result;

/// Write-back capability for one structural text location.
///
/// Implementations capture whatever handle the document library needs
/// (a shared line buffer, a run reference) and must be safe to call more
/// than once: the runner may retry a failed apply.
pub trait TextSink: Send {
    /// Replace the location's text with `text`.
    fn apply(&self, text: &str) -> Result<()>;
}

/// One independently-settable fragment inside a tagged unit.
pub struct TaggedFragment {
    /// Fragment identifier, unique within the owning unit
    pub fragment_id: String,

    /// Write-back handle for this fragment alone
    pub sink: Box<dyn TextSink>,
}

/// Payload shape of a text unit.
///
/// Plain units hold ordinary text that is segmented and reassembled by
/// concatenation. Tagged units hold a pre-encoded `<run id="...">` payload
/// covering several fragments that must be decoded and distributed
/// individually after translation.
pub enum UnitContent {
    /// Ordinary text with a single write-back sink
    Plain {
        /// Write-back handle for the whole unit
        sink: Box<dyn TextSink>,
    },

    /// Multi-fragment payload encoded with run tags
    Tagged {
        /// Fragments in original order, each with its own sink
        fragments: Vec<TaggedFragment>,
    },
}

/// One addressable text location extracted from the source document.
pub struct TextUnit {
    /// Stable identifier, unique within a run
    pub unit_id: String,

    /// The text to translate. For tagged units this is the encoded
    /// multi-fragment payload, not document text.
    pub original_text: String,

    /// Human-readable location label for diagnostics
    pub location: String,

    /// Segments produced from this unit, empty until segmented
    pub segments: Vec<TextSegment>,

    /// Plain or tagged payload
    pub content: UnitContent,
}

impl TextUnit {
    /// Create a plain (non-atomic) unit.
    pub fn plain(
        unit_id: impl Into<String>,
        original_text: impl Into<String>,
        location: impl Into<String>,
        sink: Box<dyn TextSink>,
    ) -> Self {
        Self {
            unit_id: unit_id.into(),
            original_text: original_text.into(),
            location: location.into(),
            segments: Vec::new(),
            content: UnitContent::Plain { sink },
        }
    }

    /// Create a tagged (atomic) unit from an encoded payload and its fragments.
    pub fn tagged(
        unit_id: impl Into<String>,
        encoded_text: impl Into<String>,
        location: impl Into<String>,
        fragments: Vec<TaggedFragment>,
    ) -> Self {
        Self {
            unit_id: unit_id.into(),
            original_text: encoded_text.into(),
            location: location.into(),
            segments: Vec::new(),
            content: UnitContent::Tagged { fragments },
        }
    }

    /// Whether this unit carries an encoded multi-fragment payload.
    ///
    /// Atomic units are never re-split by the segmenter; the payload travels
    /// to the provider as a single segment.
    pub fn is_atomic(&self) -> bool {
        matches!(self.content, UnitContent::Tagged { .. })
    }
}

/// An ordered slice of a unit's text, small enough to translate in isolation.
///
/// Immutable once created. Segment ids are globally unique because they are
/// derived from the owning unit id and the segment's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    /// Identifier derived from `(unit_id, order)`
    pub segment_id: String,

    /// Identifier of the owning unit
    pub unit_id: String,

    /// Literal slice of the unit's text, whitespace preserved
    pub text: String,

    /// Zero-based position within the owning unit
    pub order: usize,
}

impl TextSegment {
    /// Create a segment for `unit_id` at position `order`.
    pub fn new(unit_id: &str, text: impl Into<String>, order: usize) -> Self {
        Self {
            segment_id: format!("{}#s{}", unit_id, order),
            unit_id: unit_id.to_string(),
            text: text.into(),
            order,
        }
    }

    /// Segment length in Unicode scalar values, the currency of the
    /// character budget.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A bounded group of segments sent to the provider in one call.
#[derive(Debug, Clone)]
pub struct SegmentBatch {
    /// Monotonic identifier, assigned from 1 in emission order
    pub batch_id: usize,

    /// Member segments in input order
    pub segments: Vec<TextSegment>,
}

impl SegmentBatch {
    /// Total batch size in characters.
    pub fn char_len(&self) -> usize {
        self.segments.iter().map(|s| s.char_len()).sum()
    }
}
