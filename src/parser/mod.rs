pub mod html;
pub mod json;

/// Split a comma-separated name cell into trimmed names. A blank cell
/// is no names, not one empty name.
pub(crate) fn split_names(input: &str) -> Vec<String> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    input.split(',').map(|n| n.trim().to_string()).collect()
}

// ── Tests ──
