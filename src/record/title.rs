use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Straight and typographic double quotes
    static ref DOUBLE_QUOTES: Regex = Regex::new(r#"["\u{201C}\u{201D}\u{201E}\u{201F}]"#).unwrap();
}

/// Replace embedded double quotes with single quotes so titles print and
/// compare cleanly
pub fn sanitize_title(title: &str) -> String {
    DOUBLE_QUOTES.replace_all(title, "'").into_owned()
}

/// Title comparison used by every lookup: case-insensitive, otherwise exact
pub fn titles_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title(r#"The "Attention" Paper"#), "The 'Attention' Paper");
        assert_eq!(sanitize_title("\u{201C}Quoted\u{201D}"), "'Quoted'");
        assert_eq!(sanitize_title("plain"), "plain");
    }

    #[test]
    fn test_titles_match() {
        assert!(titles_match("Some Title", "some title"));
        assert!(!titles_match("Some Title", "Some Title "));
        assert!(!titles_match("Some Title", "Some"));
    }
}
