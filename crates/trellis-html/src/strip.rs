//! Plain-text extraction from HTML.
//!
//! Filters are applied in order. The first letter selects the filter and
//! the length of the name is its level:
//!
//! - `T`: strip tags.
//! - `E`: decode `&amp; &quot; &#039; &lt; &gt;`; `EE` decodes every entity.
//! - `R`: remove scripts and tags and collapse whitespace after line breaks;
//!   `RR` also decodes `quot amp lt gt nbsp`.
//!
//! Unknown filters are ignored.

use std::sync::LazyLock;

use regex::Regex;
use trellis_markup::{decode_entities, decode_special_chars};

/// Filters applied by default.
pub const DEFAULT_FILTERS: &[&str] = &["R", "E"];

/// Any tag, comment, or doctype.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->|<[^<>]*>").expect("invalid tag regex"));

/// Script elements with their content.
static SCRIPT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?si)<script[^>]*?>.*?</script>").expect("invalid script regex")
});

/// Loose tag pattern used by the `R` filter.
static LOOSE_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?si)<[/!]*?[^<>]*?>").expect("invalid loose tag regex"));

/// A line break followed by whitespace.
static BREAK_WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\r\n])\s+").expect("invalid whitespace regex"));

/// Entities decoded by `RR`, with their replacements.
static RR_ENTITIES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)&(quot|#34);", "\""),
        (r"(?i)&(amp|#38);", "&"),
        (r"(?i)&(lt|#60);", "<"),
        (r"(?i)&(gt|#62);", ">"),
        (r"(?i)&(nbsp|#160);", " "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("invalid entity regex"),
            replacement,
        )
    })
    .collect()
});

/// Strip markup from `text` using the given filters.
#[must_use]
pub fn strip(text: &str, filters: &[&str]) -> String {
    let mut text = text.to_owned();
    for filter in filters {
        let level = filter.chars().count();
        let Some(tag) = filter.chars().next().map(|c| c.to_ascii_uppercase()) else {
            continue;
        };
        text = match tag {
            'T' => strip_tags(&text),
            'E' if level > 1 => decode_entities(&text),
            'E' => decode_special_chars(&text),
            'R' => remove_markup(&text, level > 1),
            _ => {
                tracing::debug!(filter, "Ignoring unknown strip filter");
                continue;
            }
        };
    }
    text
}

fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").into_owned()
}

fn remove_markup(text: &str, decode: bool) -> String {
    let text = SCRIPT_PATTERN.replace_all(text, "");
    let text = LOOSE_TAG_PATTERN.replace_all(&text, "");
    let mut text = BREAK_WHITESPACE_PATTERN
        .replace_all(&text, "$1")
        .into_owned();
    if decode {
        for (pattern, replacement) in RR_ENTITIES.iter() {
            text = pattern.replace_all(&text, *replacement).into_owned();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_filters() {
        let html = "<p>Fish &amp; chips</p>\n    <script>alert('x')</script><b>now</b>";

        assert_eq!(strip(html, DEFAULT_FILTERS), "Fish & chips\nnow");
    }

    #[test]
    fn test_tags_only() {
        assert_eq!(
            strip("<p>a <!-- note --><em>b</em> &amp; c</p>", &["T"]),
            "a b &amp; c"
        );
    }

    #[test]
    fn test_special_chars_only() {
        assert_eq!(
            strip("&lt;b&gt; &quot;q&quot; &#039;s&#039; &copy;", &["E"]),
            "<b> \"q\" 's' &copy;"
        );
    }

    #[test]
    fn test_all_entities() {
        assert_eq!(strip("&copy; &#65;&nbsp;x", &["EE"]), "\u{00a9} A\u{00a0}x");
    }

    #[test]
    fn test_remove_with_entity_decoding() {
        assert_eq!(
            strip("<i>a&nbsp;&LT;b&#62;</i>\n\t c", &["RR"]),
            "a <b>\nc"
        );
    }

    #[test]
    fn test_lowercase_and_unknown_filters() {
        assert_eq!(strip("<b>x</b>", &["t", "Z", ""]), "x");
    }

    #[test]
    fn test_no_filters_is_identity() {
        assert_eq!(strip("<b>x</b>", &[]), "<b>x</b>");
    }
}
