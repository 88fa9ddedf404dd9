//! HTML entity conversion.
//!
//! Named HTML entities are converted to Unicode before fragments reach the
//! XML reader, and the same table backs full entity decoding for
//! plain-text extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Regex pattern for matching named HTML entities.
static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([a-zA-Z][a-zA-Z0-9]*);").expect("invalid entity regex"));

/// Regex pattern for any entity reference, named or numeric.
static ANY_ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);")
        .expect("invalid entity reference regex")
});

/// Convert named HTML entities to Unicode characters.
///
/// Standard XML entities (amp, lt, gt, quot, apos) are left unchanged so the
/// XML reader still sees them as references.
pub(crate) fn convert_html_entities(html: &str) -> String {
    ENTITY_PATTERN
        .replace_all(html, |caps: &regex::Captures| {
            named_entity(&caps[1]).map_or_else(|| caps[0].to_owned(), String::from)
        })
        .into_owned()
}

/// Decode the HTML special characters (`&amp;`, `&quot;`, `&#039;`, `&apos;`,
/// `&lt;`, `&gt;`), leaving every other entity untouched.
#[must_use]
pub fn decode_special_chars(text: &str) -> String {
    ANY_ENTITY_PATTERN
        .replace_all(text, |caps: &regex::Captures| {
            match &caps[1] {
                "amp" => "&",
                "quot" => "\"",
                "#039" | "#39" | "apos" => "'",
                "lt" => "<",
                "gt" => ">",
                _ => return caps[0].to_owned(),
            }
            .to_owned()
        })
        .into_owned()
}

/// Decode every known named entity and all numeric character references.
///
/// Unknown named entities are preserved as-is.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    ANY_ENTITY_PATTERN
        .replace_all(text, |caps: &regex::Captures| decode_entity(&caps[1]))
        .into_owned()
}

/// Decode a single entity reference body (without `&` and `;`).
pub(crate) fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        name => named_entity(name).map_or_else(|| format!("&{name};"), String::from),
    }
}

/// Named entities outside the XML set, sorted by name for binary search.
const NAMED_ENTITIES: &[(&str, char)] = &[
    ("Aacute", '\u{00c1}'),
    ("Auml", '\u{00c4}'),
    ("Eacute", '\u{00c9}'),
    ("Ouml", '\u{00d6}'),
    ("Uuml", '\u{00dc}'),
    ("aacute", '\u{00e1}'),
    ("agrave", '\u{00e0}'),
    ("auml", '\u{00e4}'),
    ("bull", '\u{2022}'),
    ("ccedil", '\u{00e7}'),
    ("cent", '\u{00a2}'),
    ("copy", '\u{00a9}'),
    ("darr", '\u{2193}'),
    ("deg", '\u{00b0}'),
    ("divide", '\u{00f7}'),
    ("eacute", '\u{00e9}'),
    ("egrave", '\u{00e8}'),
    ("euro", '\u{20ac}'),
    ("ge", '\u{2265}'),
    ("hellip", '\u{2026}'),
    ("iexcl", '\u{00a1}'),
    ("iquest", '\u{00bf}'),
    ("laquo", '\u{00ab}'),
    ("larr", '\u{2190}'),
    ("ldquo", '\u{201c}'),
    ("le", '\u{2264}'),
    ("lsquo", '\u{2018}'),
    ("mdash", '\u{2014}'),
    ("middot", '\u{00b7}'),
    ("nbsp", '\u{00a0}'),
    ("ndash", '\u{2013}'),
    ("ne", '\u{2260}'),
    ("ouml", '\u{00f6}'),
    ("para", '\u{00b6}'),
    ("plusmn", '\u{00b1}'),
    ("pound", '\u{00a3}'),
    ("raquo", '\u{00bb}'),
    ("rarr", '\u{2192}'),
    ("rdquo", '\u{201d}'),
    ("reg", '\u{00ae}'),
    ("rsquo", '\u{2019}'),
    ("sect", '\u{00a7}'),
    ("shy", '\u{00ad}'),
    ("szlig", '\u{00df}'),
    ("times", '\u{00d7}'),
    ("trade", '\u{2122}'),
    ("uarr", '\u{2191}'),
    ("uuml", '\u{00fc}'),
    ("yen", '\u{00a5}'),
];

/// Look up a named entity outside the XML set.
fn named_entity(name: &str) -> Option<char> {
    NAMED_ENTITIES
        .binary_search_by_key(&name, |&(entity, _)| entity)
        .ok()
        .map(|index| NAMED_ENTITIES[index].1)
}
