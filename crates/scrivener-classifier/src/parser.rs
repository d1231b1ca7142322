//! Parse inference output into whitelisted tags

use crate::error::ClassificationError;
use scrivener_domain::CategorySet;
use serde_json::Value;
use tracing::debug;

/// Read the categories named in an inference answer
///
/// Accepts a JSON array of names (optionally inside a Markdown code block or
/// surrounded by chatter), an object with a `tags` array, or free text that
/// mentions category names. Names are matched case-insensitively and
/// returned in canonical spelling, in the order the model gave them, without
/// duplicates and capped at `max_tags`.
///
/// # Errors
///
/// Returns [`ClassificationError::Unusable`] when no whitelisted category
/// can be read from the response.
pub fn parse_tags(
    response: &str,
    categories: &CategorySet,
    max_tags: usize,
) -> Result<Vec<String>, ClassificationError> {
    let body = strip_code_fence(response);

    let candidates = match json_candidates(body) {
        Some(names) => names,
        None => {
            debug!("Inference output is not JSON, scanning for category names");
            mentioned_categories(body, categories)
        }
    };

    let mut tags: Vec<String> = Vec::new();
    for name in &candidates {
        if let Some(canonical) = categories.canonical(name) {
            if !tags.iter().any(|t| t == canonical) {
                tags.push(canonical.to_string());
            }
        } else {
            debug!("Discarding non-whitelisted category '{}'", name);
        }
    }
    tags.truncate(max_tags);

    if tags.is_empty() {
        return Err(ClassificationError::Unusable(format!(
            "no whitelisted category in response: {:?}",
            truncate_for_log(response)
        )));
    }
    Ok(tags)
}

/// Remove a surrounding Markdown code block, if any
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Skip the opening fence line (```json or ```)
    let after_open = match trimmed.find('\n') {
        Some(idx) => &trimmed[idx + 1..],
        None => return "",
    };
    match after_open.rfind("```") {
        Some(idx) => after_open[..idx].trim(),
        None => after_open.trim(),
    }
}

/// Names from a JSON answer, or `None` if the text holds no usable JSON
fn json_candidates(body: &str) -> Option<Vec<String>> {
    if let Some(names) = names_from_json(body) {
        return Some(names);
    }

    // Models often wrap the array in prose: `Tags: ["Coding"]`
    let start = body.find('[')?;
    let end = body.rfind(']')?;
    if end <= start {
        return None;
    }
    names_from_json(&body[start..=end])
}

fn names_from_json(text: &str) -> Option<Vec<String>> {
    let value: Value = serde_json::from_str(text).ok()?;
    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => map.get("tags")?.as_array()?,
        _ => return None,
    };
    Some(
        items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    )
}

/// Category names appearing as whole words, ordered by first mention
fn mentioned_categories(text: &str, categories: &CategorySet) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut found: Vec<(usize, String)> = categories
        .iter()
        .filter_map(|c| find_word(&lower, &c.name.to_lowercase()).map(|pos| (pos, c.name.clone())))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, name)| name).collect()
}

/// Byte offset of the first whole-word occurrence of `needle`
fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(needle) {
        let start = from + offset;
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(start);
        }
        from = start + needle.chars().next().map_or(1, char::len_utf8);
    }
    None
}

fn truncate_for_log(text: &str) -> String {
    const MAX: usize = 120;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{}...", head)
    }
}
