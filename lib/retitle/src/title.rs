//! Filename to display-title derivation.
//!
//! Titles come from an ordered table of filename rules. The first rule that matches
//! supplies the raw title; if none match, the filename minus its extension is used.
//! The raw title then goes through suffix cleanup until nothing more can be stripped.

use regex::Regex;
use std::sync::LazyLock;

/// A named filename pattern with a `title` capture group.
pub struct TitleRule {
    pub name: &'static str,
    pattern: Regex,
}

impl TitleRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("title rule pattern must compile"),
        }
    }

    /// Raw (uncleaned) title captured by this rule, if the filename matches.
    pub fn extract<'a>(&self, filename: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(filename)
            .and_then(|caps| caps.name("title"))
            .map(|m| m.as_str())
    }
}

// Season is always two digits; episode numbers run past 99 on long-running shows.
static RULES: LazyLock<Vec<TitleRule>> = LazyLock::new(|| {
    vec![
        TitleRule::new(
            "show-season-episode",
            r"(?i)^.+? - S\d{2}E\d+ - (?P<title>.+?)\.[^.]+$",
        ),
        TitleRule::new("season-episode", r"(?i)^S\d{2}E\d+ - (?P<title>.+?)\.[^.]+$"),
    ]
});

static RE_BRACKET_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[[0-9]+\]\s*$").unwrap());
static RE_CID_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\(cid\s+[^)]+\)\s*$").unwrap());
// Also eats legitimate numbers such as "Top Moves (10)"; that is how the
// naming convention marks duplicates, so it stays.
static RE_DUP_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\(\d+\)\s*$").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// The ordered rule table used by [`derive`].
pub fn rules() -> &'static [TitleRule] {
    &RULES
}

/// Derive a display title from a filename or full path.
///
/// Returns `None` only when nothing is left after cleanup; a `Some` value is
/// never empty, never padded with whitespace and never ends in an id marker.
pub fn derive(filename: &str) -> Option<String> {
    let base = basename(filename);

    let raw = RULES
        .iter()
        .find_map(|rule| rule.extract(base))
        .unwrap_or_else(|| strip_extension(base));

    let cleaned = clean(raw);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Strip trailing id markers and normalize whitespace.
///
/// Suffixes are stripped repeatedly so that stacked markers such as
/// `Title [123] (cid 9)` come off regardless of the order they appear in.
pub fn clean(raw: &str) -> String {
    let mut current = RE_WHITESPACE.replace_all(raw, " ").trim().to_string();
    loop {
        let mut next = RE_BRACKET_ID.replace(&current, "").to_string();
        next = RE_CID_SUFFIX.replace(&next, "").to_string();
        next = RE_DUP_SUFFIX.replace(&next, "").to_string();
        let next = next.trim().to_string();
        if next == current {
            return current;
        }
        current = next;
    }
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.trim_start_matches('.').is_empty() => stem,
        _ => name,
    }
}
