/*!
 * Budget-aware text segmentation.
 *
 * Splits a unit's text into translation-sized segments, preferring sentence
 * boundaries, then clause boundaries, then whitespace tokens, and finally
 * fixed-width character windows for text with no split points at all.
 * Whitespace and punctuation are never stripped: concatenating a unit's
 * segments in order reproduces the original text exactly.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document_model::{TextSegment, TextUnit};

// Terminal punctuation covers Latin, CJK, ellipsis and Arabic variants.
static SENTENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s).+?(?:[.!?…‽。！？；؛](?:\s+|$)|$)").unwrap()
});

static CLAUSE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s).+?(?:[,;:،，；：](?:\s+|$)|$)").unwrap()
});

/// Length in Unicode scalar values, the unit of the character budget.
fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Detect whether the text contains CJK characters.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| {
        let code = c as u32;
        (0x4E00..=0x9FFF).contains(&code)      // CJK Unified Ideographs
            || (0x3400..=0x4DBF).contains(&code) // Extension A
            || (0x3040..=0x30FF).contains(&code) // Hiragana/Katakana
            || (0xAC00..=0xD7AF).contains(&code) // Hangul syllables
    })
}

/// Split text by greedily consuming pattern matches from the start.
fn consume_pattern(pattern: &Regex, text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut index = 0;
    let length = text.len();
    while index < length {
        let Some(found) = pattern.find_at(text, index) else {
            pieces.push(text[index..].to_string());
            break;
        };
        let mut end = found.end();
        if end == index {
            // Consume at least one character to avoid a zero-length loop.
            let step = text[index..].chars().next().map_or(1, char::len_utf8);
            end = index + step;
        }
        pieces.push(text[index..end].to_string());
        index = end;
    }
    pieces
}

/// Tokenise text into word+trailing-whitespace tokens without losing anything.
fn tokenise_preserving_whitespace(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut idx = 0;
    let length = chars.len();
    while idx < length {
        let start = idx;
        if chars[idx].is_whitespace() {
            while idx < length && chars[idx].is_whitespace() {
                idx += 1;
            }
        } else {
            while idx < length && !chars[idx].is_whitespace() {
                idx += 1;
            }
            while idx < length && chars[idx].is_whitespace() {
                idx += 1;
            }
        }
        tokens.push(chars[start..idx].iter().collect());
    }
    tokens
}

/// Hard-cut text into fixed windows of `budget` code points.
///
/// Last resort for whitespace-free runs (dense CJK, long identifiers). The
/// cut ignores grapheme-cluster boundaries; an accepted approximation.
fn split_fixed_width(text: &str, budget: usize) -> Vec<String> {
    if budget == 0 {
        return vec![text.to_string()];
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(budget)
        .map(|window| window.iter().collect())
        .collect()
}

/// Split text on whitespace boundaries while preserving formatting.
fn split_words(text: &str, budget: usize) -> Vec<String> {
    let tokens = tokenise_preserving_whitespace(text);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for token in tokens {
        let token_len = char_len(&token);
        if token_len > budget {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
                current_len = 0;
            }
            segments.extend(split_fixed_width(&token, budget));
            continue;
        }

        if current_len + token_len > budget && !current.is_empty() {
            segments.push(std::mem::replace(&mut current, token));
            current_len = token_len;
        } else {
            current.push_str(&token);
            current_len += token_len;
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Greedily repack smaller chunks into budget-sized segments.
fn pack_chunks(chunks: &[String], budget: usize) -> Vec<String> {
    let mut packed = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for chunk in chunks {
        if chunk.is_empty() {
            continue;
        }
        let chunk_len = char_len(chunk);
        if chunk_len > budget {
            if !current.is_empty() {
                packed.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if contains_cjk(chunk.trim()) || chunk.trim().is_empty() {
                packed.extend(split_fixed_width(chunk, budget));
            } else {
                packed.extend(split_words(chunk, budget));
            }
            continue;
        }
        if current_len + chunk_len > budget && !current.is_empty() {
            packed.push(std::mem::replace(&mut current, chunk.clone()));
            current_len = chunk_len;
        } else {
            current.push_str(chunk);
            current_len += chunk_len;
        }
    }

    if !current.is_empty() {
        packed.push(current);
    }

    packed
}

/// Segment text into sentence-aligned chunks respecting the budget.
pub fn segment_text(text: &str, budget: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let sentences = consume_pattern(&SENTENCE_PATTERN, text);
    let mut segments = Vec::new();

    for sentence in sentences {
        if char_len(&sentence) <= budget {
            segments.push(sentence);
            continue;
        }

        let clauses = consume_pattern(&CLAUSE_PATTERN, &sentence);
        let longest_clause = clauses.iter().map(|c| char_len(c)).max().unwrap_or(0);
        if !clauses.is_empty() && longest_clause <= budget {
            segments.extend(pack_chunks(&clauses, budget));
            continue;
        }

        let word_segments = split_words(&sentence, budget);
        if word_segments.is_empty() {
            segments.push(sentence);
        } else {
            segments.extend(word_segments);
        }
    }

    segments
}

/// Turns text units into sized translation segments.
pub struct Segmenter {
    budget: usize,
}

impl Segmenter {
    /// Create a segmenter for the given character budget. A budget of zero
    /// is treated as 1.
    pub fn new(budget: usize) -> Self {
        Self {
            budget: budget.max(1),
        }
    }

    /// The effective character budget.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Segment every unit, writing the result onto each unit and returning
    /// the flat segment list in extraction order.
    ///
    /// Tagged (atomic) units pass through as a single segment holding the
    /// encoded payload. Units whose text is empty or whitespace-only get no
    /// segments and drop out of translation and reinsertion entirely.
    pub fn segment_units(&self, units: &mut [TextUnit]) -> Vec<TextSegment> {
        let mut segments = Vec::new();
        for unit in units.iter_mut() {
            let raw = if unit.is_atomic() {
                if unit.original_text.is_empty() {
                    Vec::new()
                } else {
                    vec![unit.original_text.clone()]
                }
            } else if unit.original_text.trim().is_empty() {
                Vec::new()
            } else {
                segment_text(&unit.original_text, self.budget)
            };

            if raw.is_empty() {
                continue;
            }

            unit.segments = raw
                .into_iter()
                .enumerate()
                .map(|(idx, content)| TextSegment::new(&unit.unit_id, content, idx))
                .collect();
            segments.extend(unit.segments.iter().cloned());
        }
        segments
    }
}
