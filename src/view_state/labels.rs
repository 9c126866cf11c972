//! Small display helpers shared by the view records.

/// Badge tint for status chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeColor {
    Gray,
    Blue,
    Amber,
    Green,
    Purple,
    Red,
}

impl BadgeColor {
    /// Hex color used by the default theme.
    pub fn hex(&self) -> &'static str {
        match self {
            BadgeColor::Gray => "#6B7280",
            BadgeColor::Blue => "#3B82F6",
            BadgeColor::Amber => "#F59E0B",
            BadgeColor::Green => "#10B981",
            BadgeColor::Purple => "#8B5CF6",
            BadgeColor::Red => "#EF4444",
        }
    }
}

const LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("de", "German"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fa", "Persian"),
    ("fr", "French"),
    ("hi", "Hindi"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("tr", "Turkish"),
    ("ur", "Urdu"),
    ("zh", "Chinese"),
];

/// Human name for a language code (`"en"`, `"en-US"`, `"AR"`). Unknown codes
/// are returned unchanged.
pub fn language_label(code: &str) -> &str {
    let primary = code.split(['-', '_']).next().unwrap_or(code);
    LANGUAGES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(primary))
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// Number of trailing characters shown for opaque ids.
pub const SHORT_ID_LEN: usize = 6;

/// Last six characters of an id; shorter ids are returned whole.
pub fn short_id(id: &str) -> &str {
    let count = id.chars().count();
    if count <= SHORT_ID_LEN {
        return id;
    }
    let start = id
        .char_indices()
        .nth(count - SHORT_ID_LEN)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    &id[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_label() {
        assert_eq!(language_label("en"), "English");
        assert_eq!(language_label("AR"), "Arabic");
        assert_eq!(language_label("pt-BR"), "Portuguese");
        assert_eq!(language_label("xx"), "xx");
        assert_eq!(language_label(""), "");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("65f1c2a9b7e4d3"), "b7e4d3");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("abcdef"), "abcdef");
        assert_eq!(short_id(""), "");
        assert_eq!(short_id("ééééééé"), "éééééé");
    }
}
