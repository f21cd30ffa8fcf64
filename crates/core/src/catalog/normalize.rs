//! Text normalization used for catalog keys and matching.

/// Lowercase, strip punctuation, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    out.trim_end().to_string()
}

/// Normalize a title for keying: the subtitle after the first colon or
/// spaced dash is dropped, then the remainder goes through
/// [`normalize_text`]. "The Power Broker: Robert Moses and the Fall of
/// New York" keys the same as "the power broker".
pub fn normalize_title(s: &str) -> String {
    let main = match (s.find(':'), s.find(" - ")) {
        (Some(a), Some(b)) => &s[..a.min(b)],
        (Some(a), None) => &s[..a],
        (None, Some(b)) => &s[..b],
        (None, None) => s,
    };
    normalize_text(main)
}

/// Normalize an author credit: the leading "by" is dropped, then the
/// remainder goes through [`normalize_text`].
pub fn normalize_author(s: &str) -> String {
    let trimmed = s.trim();
    let without_by = trimmed
        .strip_prefix("by ")
        .or_else(|| trimmed.strip_prefix("By "))
        .or_else(|| trimmed.strip_prefix("BY "))
        .unwrap_or(trimmed);
    normalize_text(without_by)
}

/// Strip an ISBN down to its digits (and the X check character).
pub fn normalize_isbn(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .collect::<String>()
        .to_lowercase()
}

/// Combined key for the normalized (title, author) lookup.
pub fn title_author_key(title: &str, author: &str) -> String {
    format!("{}|{}", normalize_title(title), normalize_author(author))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_basic() {
        assert_eq!(normalize_text("The Night Watchman"), "the night watchman");
        assert_eq!(normalize_text("  It  Ends   With Us "), "it ends with us");
        assert_eq!(normalize_text("Mrs. Dalloway!"), "mrs dalloway");
    }

    #[test]
    fn test_normalize_title_strips_subtitle() {
        assert_eq!(
            normalize_title("The Power Broker: Robert Moses and the Fall of New York"),
            "the power broker"
        );
        assert_eq!(normalize_title("Educated - A Memoir"), "educated");
        // Unspaced hyphens stay, they are part of the word
        assert_eq!(normalize_title("Spider-Man"), "spider man");
    }

    #[test]
    fn test_normalize_title_first_separator_wins() {
        assert_eq!(normalize_title("A - B: C"), "a");
        assert_eq!(normalize_title("A: B - C"), "a");
    }

    #[test]
    fn test_normalize_author() {
        assert_eq!(normalize_author("by Louise Erdrich"), "louise erdrich");
        assert_eq!(normalize_author("Louise Erdrich"), "louise erdrich");
        // "by" only stripped as a prefix word
        assert_eq!(normalize_author("Byron Katie"), "byron katie");
    }

    #[test]
    fn test_normalize_isbn() {
        assert_eq!(normalize_isbn("978-0-06-267118-9"), "9780062671189");
        assert_eq!(normalize_isbn("006267118X"), "006267118x");
        assert_eq!(normalize_isbn(""), "");
    }

    #[test]
    fn test_title_author_key() {
        assert_eq!(
            title_author_key("The Night Watchman", "by Louise Erdrich"),
            "the night watchman|louise erdrich"
        );
    }
}
