use isolang::Language;

/// Language descriptor helpers.
///
/// Users pass languages as ISO 639-1/639-3 codes or plain English names;
/// providers get a readable name, output filenames get a safe suffix.
/// Resolve a descriptor (code or English name) to a language.
pub fn resolve_language(descriptor: &str) -> Option<Language> {
    let trimmed = descriptor.trim();
    let lowered = trimmed.to_lowercase();

    if lowered.len() == 2 {
        if let Some(language) = Language::from_639_1(&lowered) {
            return Some(language);
        }
    }
    if lowered.len() == 3 {
        if let Some(language) = Language::from_639_3(&lowered) {
            return Some(language);
        }
    }

    Language::from_name(trimmed).or_else(|| {
        // from_name matches the capitalized English name exactly.
        let mut chars = lowered.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => return None,
        };
        Language::from_name(&capitalized)
    })
}

/// English display name for provider prompts.
///
/// Falls back to the raw descriptor when it does not resolve, so unusual
/// language names still reach the provider verbatim.
pub fn display_name(descriptor: &str) -> String {
    resolve_language(descriptor)
        .map(|language| language.to_name().to_string())
        .unwrap_or_else(|| descriptor.trim().to_string())
}

/// Generate a filesystem-friendly suffix from a language descriptor.
pub fn filename_suffix(descriptor: &str) -> String {
    let collapsed = descriptor.trim().split_whitespace().collect::<Vec<_>>().join("-");
    let cleaned: String = collapsed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if cleaned.is_empty() {
        "translated".to_string()
    } else {
        cleaned
    }
}
