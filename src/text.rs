use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

/// Fold a name or title into its canonical comparison form: punctuation
/// removed, lower-cased, diacritics stripped, whitespace collapsed to
/// single spaces.
///
/// Punctuation is removed over the whole input before tokenizing, so a
/// stylized handle and its plain spelling land on the same key. The
/// display string is never modified; callers keep it for rendering.
pub fn normalize(input: &str) -> String {
    let stripped: String = input
        .chars()
        .filter(|c| c.general_category_group() != GeneralCategoryGroup::Punctuation)
        .collect();

    stripped
        .split_whitespace()
        .map(fold_token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase, then decompose and drop combining marks so accented and
/// unaccented spellings compare equal. Recomposed to NFC at the end.
fn fold_token(token: &str) -> String {
    token
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect()
}

// ── Tests ──
