/*!
 * Run-tagging wire codec.
 *
 * Several independently-settable fragments (formatting runs that together
 * form one sentence) are encoded as `<run id="...">text</run>` sequences so
 * a provider can translate them in one call and redistribute words across
 * fragment boundaries. Decoding maps the tagged response back to per-fragment
 * text, rejecting anything that breaks per-fragment addressability.
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppError;

static RUN_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<run\s+id="([^"]+)">(.*?)</run>"#).unwrap());

/// Escape text so it cannot be read as markup inside a run tag.
pub fn escape_text(text: &str) -> String {
    // Ampersand first so the other replacements are not double-escaped.
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Reverse [`escape_text`].
pub fn unescape_text(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Encode `(fragment_id, text)` pairs as one taggable payload, in order.
pub fn encode_fragments(fragments: &[(String, String)]) -> String {
    let mut encoded = String::new();
    for (fragment_id, text) in fragments {
        encoded.push_str(&format!(
            r#"<run id="{}">{}</run>"#,
            fragment_id,
            escape_text(text)
        ));
    }
    encoded
}

/// Parse a tagged translation back into a fragment id → text mapping.
///
/// Scans strictly left to right. Non-whitespace content outside tags, an id
/// not in `expected_ids`, a duplicated id, or a missing id is a format
/// violation; missing ids are named in the error.
pub fn decode_tagged(
    translated: &str,
    expected_ids: &[String],
) -> Result<HashMap<String, String>, AppError> {
    let mut mapping: HashMap<String, String> = HashMap::new();
    let mut cursor = 0;

    for captures in RUN_TAG_PATTERN.captures_iter(translated) {
        let whole = captures.get(0).unwrap();
        let prefix = &translated[cursor..whole.start()];
        if !prefix.trim().is_empty() {
            return Err(AppError::TagFormat(
                "translated output contained unexpected content outside <run> tags".to_string(),
            ));
        }

        let run_id = captures.get(1).unwrap().as_str();
        if !expected_ids.iter().any(|id| id == run_id) {
            return Err(AppError::TagFormat(format!(
                "translated output contained an unknown run id '{}'",
                run_id
            )));
        }
        if mapping.contains_key(run_id) {
            return Err(AppError::TagFormat(format!(
                "translated output duplicated run id '{}'",
                run_id
            )));
        }

        let content = unescape_text(captures.get(2).unwrap().as_str());
        mapping.insert(run_id.to_string(), content);
        cursor = whole.end();
    }

    let suffix = &translated[cursor..];
    if !suffix.trim().is_empty() {
        return Err(AppError::TagFormat(
            "translated output contained unexpected trailing content outside <run> tags"
                .to_string(),
        ));
    }

    if mapping.len() != expected_ids.len() {
        let missing: Vec<&str> = expected_ids
            .iter()
            .filter(|id| !mapping.contains_key(id.as_str()))
            .map(|id| id.as_str())
            .collect();
        return Err(AppError::TagFormat(format!(
            "translation output missing expected runs: {}",
            missing.join(", ")
        )));
    }

    Ok(mapping)
}
