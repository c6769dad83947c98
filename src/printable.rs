//! Printable-character filter applied to keys, help text and input lines.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Strip every character that does not render as visible text.
///
/// Kept: letters, marks, numbers, punctuation, symbols and the ASCII space.
/// Everything else goes: controls, format characters, private-use and
/// unassigned code points, and every other kind of space or separator.
pub fn printable(text: &str) -> String {
    text.chars().filter(|&c| is_printable_char(c)).collect()
}

/// True when `printable(text)` would leave `text` unchanged.
pub fn is_printable(text: &str) -> bool {
    text.chars().all(is_printable_char)
}

fn is_printable_char(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::PrivateUse
            | GeneralCategory::Surrogate
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}
