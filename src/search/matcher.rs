//! Filename matching: glob (exact or wildcard) and fuzzy subsequence
use glob::{MatchOptions, Pattern};
use std::iter::Peekable;
use std::str::Chars;

const CASE_INSENSITIVE: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Matcher compiled once per search from the configured pattern
#[derive(Debug, Clone)]
pub enum NameMatcher {
    /// `*`, `?` and `[...]` wildcards; a plain name is an exact match.
    /// `None` when the pattern is malformed.
    Glob(Option<Pattern>),
    /// Lower-cased pattern for subsequence matching.
    Fuzzy(String),
}

impl NameMatcher {
    pub fn new(pattern: &str, advanced: bool) -> Self {
        if advanced {
            return NameMatcher::Fuzzy(pattern.to_lowercase());
        }
        NameMatcher::Glob(translate_pattern(pattern).and_then(|p| Pattern::new(&p).ok()))
    }

    /// False for a glob pattern that failed to compile.
    pub fn is_valid(&self) -> bool {
        !matches!(self, NameMatcher::Glob(None))
    }

    pub fn matches(&self, filename: &str) -> bool {
        match self {
            NameMatcher::Fuzzy(pattern) => fuzzy_match(&filename.to_lowercase(), pattern),
            NameMatcher::Glob(Some(pattern)) => {
                pattern.matches(filename) || pattern.matches_with(filename, CASE_INSENSITIVE)
            }
            NameMatcher::Glob(None) => false,
        }
    }
}

/// Character class that no character satisfies.
const EMPTY_CLASS: &str = "[!\u{0}-\u{10FFFF}]";

/// Rewrites shell-style wildcard syntax into `glob::Pattern` syntax.
///
/// Classes negate with `[^...]`, a backslash makes the next character
/// literal (inside classes too), and `-` or `]` inside a class must be
/// escaped. Runs of `*` collapse into one. Returns `None` for a malformed
/// pattern: an unterminated or empty class, a bare `-`/`]` in a class, or a
/// trailing backslash.
pub fn translate_pattern(pattern: &str) -> Option<String> {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => {
                while chars.next_if_eq(&'*').is_some() {}
                out.push('*');
            }
            '?' => out.push('?'),
            '[' => out.push_str(&translate_class(&mut chars)?),
            '\\' => out.push_str(&Pattern::escape(&chars.next()?.to_string())),
            c => out.push_str(&Pattern::escape(&c.to_string())),
        }
    }

    Some(out)
}

/// Parses a class body after its opening `[` up to and including the `]`.
fn translate_class(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let negated = chars.next_if_eq(&'^').is_some();
    let mut ranges = Vec::new();

    loop {
        if !ranges.is_empty() && chars.next_if_eq(&']').is_some() {
            break;
        }
        let lo = class_char(chars)?;
        let hi = if chars.next_if_eq(&'-').is_some() {
            class_char(chars)?
        } else {
            lo
        };
        ranges.push((lo, hi));
    }

    Some(render_class(negated, &ranges))
}

fn class_char(chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    match chars.next()? {
        '-' | ']' => None,
        '\\' => chars.next(),
        c => Some(c),
    }
}

/// Emits a class for `glob::Pattern`, which reads `!` first as negation, `]`
/// only as the first member, and `-` between two members as a range. Those
/// three are split out of ranges and placed where they stay literal.
fn render_class(negated: bool, ranges: &[(char, char)]) -> String {
    let mut members = String::new();
    let mut specials = Vec::new();

    for &(lo, hi) in ranges {
        let (mut start, end) = (lo as u32, hi as u32);
        for special in ['!', '-', ']'] {
            let code = special as u32;
            if start <= code && code <= end {
                push_range(&mut members, start, code - 1);
                specials.push(special);
                start = code + 1;
            }
        }
        push_range(&mut members, start, end);
    }

    let mut body = String::new();
    if specials.contains(&']') {
        body.push(']');
    }
    body.push_str(&members);
    if specials.contains(&'!') {
        body.push('!');
    }
    if specials.contains(&'-') {
        body.push('-');
    }

    match (negated, body.as_str()) {
        (true, "") => "?".to_string(),
        (false, "") => EMPTY_CLASS.to_string(),
        (false, "!") => "!".to_string(),
        (false, "!-") => "[-!]".to_string(),
        (true, body) => format!("[!{body}]"),
        (false, body) => format!("[{body}]"),
    }
}

/// Appends `start..=end` as a single member or an `a-z` range; empty spans
/// are skipped.
fn push_range(out: &mut String, start: u32, end: u32) {
    if start > end {
        return;
    }
    if let (Some(lo), Some(hi)) = (char::from_u32(start), char::from_u32(end)) {
        out.push(lo);
        if lo != hi {
            out.push('-');
            out.push(hi);
        }
    }
}

/// Returns true when every character of `pattern` occurs in `text` in order.
///
/// Scans left to right without backtracking. Callers lower-case both sides
/// for case-insensitive matching.
pub fn fuzzy_match(text: &str, pattern: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }
    if text.is_empty() {
        return false;
    }

    let mut text_chars = text.chars();
    pattern
        .chars()
        .all(|pc| text_chars.by_ref().any(|tc| tc == pc))
}

/// Extension of a bare filename: everything after the last dot, or "".
pub fn filename_extension(filename: &str) -> &str {
    filename
        .rfind('.')
        .map(|idx| &filename[idx + 1..])
        .unwrap_or("")
}
