//! Shared string helpers.

/// Truncate text to `max_length` code points, appending an ellipsis when
/// anything was cut. A `max_length` below 3 yields a clipped ellipsis.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    if max_length < 3 {
        return "...".chars().take(max_length).collect();
    }

    let mut truncated: String = text.chars().take(max_length - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Uppercase the first code point only.
pub fn capitalize_first_letter(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a snake_case string to human-readable form.
///
/// `"plan_upgrade_started"` reads as `"plan upgrade started"`.
pub fn humanize_snake_case_string(text: &str) -> String {
    text.replace('_', " ").to_lowercase()
}

/// Replace hyphens with underscores, preserving case.
pub fn hyphens_to_snake_case(text: &str) -> String {
    text.replace('-', "_")
}
