//! String helpers: entity escaping, HTML stripping, blank/JSON checks.

/// Entity table used when writing autocomplete suggestions back into the
/// input. Applied in table order in both directions.
pub const SUGGESTION_ENTITIES: [(&str, &str); 6] = [
    ("&", "&amp;"),
    ("\"", "&quot;"),
    ("<", "&lt;"),
    (">", "&gt;"),
    ("'", "&rsquo;"),
    (" ", "&nbsp;"),
];

/// General purpose entity table for [`clean_string`] / [`dirty_string`].
pub const TEXT_ENTITIES: [(&str, &str); 7] = [
    ("&", "&amp;"),
    ("<", "&lt;"),
    (">", "&gt;"),
    ("\"", "&quot;"),
    ("`", "&#96;"),
    ("'", "&#39;"),
    ("\n", "&crarr;"),
];

/// Escape the characters of [`SUGGESTION_ENTITIES`].
pub fn clean_suggestion(s: &str) -> String {
    SUGGESTION_ENTITIES
        .iter()
        .fold(s.to_string(), |acc, (raw, entity)| acc.replace(raw, entity))
}

/// Undo [`clean_suggestion`]. Replacements run in table order, so `&amp;`
/// is decoded first.
pub fn dirty_suggestion(s: &str) -> String {
    SUGGESTION_ENTITIES
        .iter()
        .fold(s.to_string(), |acc, (raw, entity)| acc.replace(entity, raw))
}

/// Replace markup-sensitive characters with entities.
pub fn clean_string(s: &str) -> String {
    TEXT_ENTITIES
        .iter()
        .fold(s.to_string(), |acc, (raw, entity)| acc.replace(raw, entity))
}

/// Replace entities with the raw characters.
///
/// Runs the table back to front so `&amp;` is decoded last and an escaped
/// entity such as `&amp;lt;` comes back as the literal text `&lt;`.
pub fn dirty_string(s: &str) -> String {
    TEXT_ENTITIES
        .iter()
        .rev()
        .fold(s.to_string(), |acc, (raw, entity)| acc.replace(entity, raw))
}

/// Remove HTML tags (`<tag ...>`, `</tag>`), keeping the text between them.
pub fn strip_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let is_tag_start = after.chars().next().is_some_and(|c| !c.is_whitespace());
        let close = after.find(['<', '>']);

        match close {
            Some(end) if is_tag_start && after.as_bytes()[end] == b'>' => {
                out.push_str(&rest[..start]);
                rest = &after[end + 1..];
            }
            _ => {
                out.push_str(&rest[..=start]);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn trim(s: &str) -> &str {
    s.trim()
}

/// Uppercase the first character.
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// True when `s` is a complete JSON document.
pub fn is_json(s: &str) -> bool {
    !is_blank(s) && serde_json::from_str::<serde_json::Value>(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_round_trip() {
        for s in ["&", "\"<>'", "& &", "<<&&>>", " '\"", "&\"<>' "] {
            assert_eq!(dirty_suggestion(&clean_suggestion(s)), s, "input {:?}", s);
        }
    }

    #[test]
    fn test_clean_suggestion_escapes_ampersand_once() {
        assert_eq!(clean_suggestion("a&b c"), "a&amp;b&nbsp;c");
        assert_eq!(clean_suggestion("<x>"), "&lt;x&gt;");
    }

    #[test]
    fn test_dirty_suggestion_decodes_entities() {
        assert_eq!(dirty_suggestion("Tom&rsquo;s&nbsp;&amp;&nbsp;Jerry"), "Tom's & Jerry");
        assert_eq!(dirty_suggestion("plain"), "plain");
    }

    #[test]
    fn test_clean_and_dirty_string() {
        let raw = "if a < b && c > \"d\"\n";
        let cleaned = clean_string(raw);
        assert!(!cleaned.contains('<'));
        assert!(!cleaned.contains('\n'));
        assert_eq!(dirty_string(&cleaned), raw);

        // Escaped entities survive a round trip as literal text
        assert_eq!(dirty_string(&clean_string("&lt;")), "&lt;");
    }

    #[test]
    fn test_quote_marks_use_numeric_entities() {
        assert_eq!(clean_string("`it's`"), "&#96;it&#39;s&#96;");
        assert_eq!(dirty_string("&#96;it&#39;s&#96;"), "`it's`");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<b>bold</b> text"), "bold text");
        assert_eq!(strip_html("<a href=\"x\">link</a>"), "link");
        assert_eq!(strip_html("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_ucfirst_and_blank() {
        assert_eq!(ucfirst("hello"), "Hello");
        assert_eq!(ucfirst(""), "");
        assert_eq!(ucfirst("émile"), "Émile");
        assert!(is_blank("   \t\n"));
        assert!(is_blank(""));
        assert!(!is_blank(" x "));
        assert_eq!(trim("  x  "), "x");
    }

    #[test]
    fn test_is_json() {
        assert!(is_json("{\"a\": [1, 2.5, true, null]}"));
        assert!(is_json("[]"));
        assert!(!is_json("{a: 1}"));
        assert!(!is_json("   "));
    }
}
