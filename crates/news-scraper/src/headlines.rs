use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Lines the search page renders as `<h3>` that are never stock news.
pub const BLOCKED_HEADLINES: &[&str] = &[
    "BBC World News TV",
    "BBC World Service Radio",
    "News daily newsletter",
    "Mobile app",
    "Get in touch",
];

lazy_static! {
    static ref H3_PATTERN: Regex = Regex::new(r"(?is)<h3\b[^>]*>(.*?)</h3\s*>").unwrap();
    static ref TAG_PATTERN: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref WS_PATTERN: Regex = Regex::new(r"\s+").unwrap();
    static ref ENTITY_PATTERN: Regex =
        Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z]+));").unwrap();
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "hellip" => '\u{2026}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "bull" => '\u{2022}',
        "middot" => '\u{00B7}',
        "copy" => '\u{00A9}',
        "reg" => '\u{00AE}',
        "trade" => '\u{2122}',
        _ => return None,
    };
    Some(c)
}

/// Decode character references in one pass. Unknown names and invalid code
/// points are left as written.
fn decode_entities(text: &str) -> String {
    ENTITY_PATTERN
        .replace_all(text, |cap: &Captures| {
            let decoded = if let Some(dec) = cap.get(1) {
                dec.as_str().parse().ok().and_then(char::from_u32)
            } else if let Some(hex) = cap.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else {
                cap.get(3).and_then(|name| named_entity(name.as_str()))
            };
            match decoded {
                // non-breaking space collapses like any other whitespace
                Some(c) if c == '\u{00A0}' => " ".to_string(),
                Some(c) => c.to_string(),
                None => cap[0].to_string(),
            }
        })
        .into_owned()
}

/// Text of every `<h3>` element, in document order, tags stripped.
pub fn extract_h3_text(html: &str) -> Vec<String> {
    H3_PATTERN
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|inner| {
            let text = TAG_PATTERN.replace_all(inner.as_str(), " ");
            let text = decode_entities(&text);
            WS_PATTERN.replace_all(&text, " ").trim().to_string()
        })
        .collect()
}

/// Drop empty and blocked lines, keep the first copy of each exact title.
pub fn filter_headlines(titles: Vec<String>, blocked: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();
    titles
        .into_iter()
        .filter(|t| !t.is_empty() && !blocked.contains(&t.as_str()))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

pub fn extract_headlines(html: &str) -> Vec<String> {
    filter_headlines(extract_h3_text(html), BLOCKED_HEADLINES)
}
