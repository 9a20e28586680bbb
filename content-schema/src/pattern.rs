//! File path patterns.
//!
//! Patterns use the minimatch-style dialect of the content tooling:
//! - `*` any run of characters within one path segment, `?` a single one
//! - `**` as a whole segment: zero or more directories
//! - `[abc]`, `[a-z]`, `[!abc]` character classes
//! - `{a,b}` brace alternation, expanded into whole patterns before anything
//!   else is translated, so `{docs/**,guides/**}` keeps both globstars
//! - `@(a|b)`, `?(a|b)`, `*(a|b)`, `+(a|b)` extglob groups
//!
//! Each pattern is compiled once into an anchored [`Regex`].

use std::fmt;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::SchemaError;

/// A compiled file path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
}

impl PathPattern {
    /// Compile a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPattern`] for unterminated groups or
    /// classes, negated extglob groups `!(..)`, and a trailing escape.
    pub fn new(pattern: &str) -> Result<Self, SchemaError> {
        let invalid = |cause: String| SchemaError::InvalidPattern {
            pattern: pattern.to_owned(),
            cause,
        };

        let chars: Vec<char> = pattern.chars().collect();
        let body = expand_braces(&chars)
            .and_then(|expanded| {
                expanded
                    .iter()
                    .map(|alt| translate(alt, true))
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(invalid)?
            .join("|");
        let regex = Regex::new(&format!("^(?:{body})$")).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            source: pattern.to_owned(),
            regex,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Test a path relative to the content root.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(&normalize_path(path))
    }

    /// Test a path or any of its ancestor directories.
    #[must_use]
    pub fn matches_path_or_ancestor(&self, path: &str) -> bool {
        let normalized = normalize_path(path);
        if self.regex.is_match(&normalized) {
            return true;
        }
        normalized
            .match_indices('/')
            .any(|(idx, _)| self.regex.is_match(&normalized[..idx]))
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathPattern {}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for PathPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// Normalize a path for matching against the content root.
///
/// `\` becomes `/`, empty and `.` segments are dropped, and a leading `/` is
/// removed. `..` segments are kept as written.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Expand every brace group into separate patterns, outermost first.
fn expand_braces(chars: &[char]) -> Result<Vec<Vec<char>>, String> {
    let Some(open) = find_brace(chars)? else {
        return Ok(vec![chars.to_vec()]);
    };
    let (alternatives, close) = split_group(chars, open + 1, '}', ',')?;

    let mut expanded = Vec::new();
    for alt in alternatives {
        let mut candidate = chars[..open].to_vec();
        candidate.extend_from_slice(alt);
        candidate.extend_from_slice(&chars[close + 1..]);
        expanded.extend(expand_braces(&candidate)?);
    }
    Ok(expanded)
}

fn find_brace(chars: &[char]) -> Result<Option<usize>, String> {
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' => i = translate_class(chars, i)?.1,
            '{' => return Ok(Some(i)),
            _ => {}
        }
        i += 1;
    }
    Ok(None)
}

fn translate(chars: &[char], top_level: bool) -> Result<String, String> {
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if c == '*' && next == Some('*') && top_level && is_segment_start(chars, i) {
            match chars.get(i + 2) {
                None => {
                    out.push_str(".*");
                    i += 2;
                    continue;
                }
                Some('/') => {
                    out.push_str("(?:[^/]+/)*");
                    i += 3;
                    continue;
                }
                Some(_) => {}
            }
        }

        if matches!(c, '*' | '?' | '+' | '@' | '!') && next == Some('(') {
            if c == '!' {
                return Err("negated extglob groups '!(...)' are not supported".to_owned());
            }
            let (alternatives, end) = split_group(chars, i + 2, ')', '|')?;
            out.push_str("(?:");
            out.push_str(&translate_alternatives(&alternatives)?);
            out.push(')');
            match c {
                '*' => out.push('*'),
                '?' => out.push('?'),
                '+' => out.push('+'),
                _ => {}
            }
            i = end + 1;
            continue;
        }

        match c {
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                let (class, end) = translate_class(chars, i)?;
                out.push_str(&class);
                i = end;
            }
            '\\' => {
                let Some(escaped) = next else {
                    return Err("pattern ends with an escape character".to_owned());
                };
                out.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4])));
                i += 1;
            }
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }

    Ok(out)
}

fn translate_alternatives(alternatives: &[&[char]]) -> Result<String, String> {
    let translated = alternatives
        .iter()
        .map(|alt| translate(alt, false))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(translated.join("|"))
}

fn is_segment_start(chars: &[char], i: usize) -> bool {
    i == 0 || chars[i - 1] == '/'
}

/// Split the body of a group that starts at `start` into its alternatives.
///
/// Returns the alternatives and the index of the closing character.
fn split_group(
    chars: &[char],
    start: usize,
    close: char,
    separator: char,
) -> Result<(Vec<&[char]>, usize), String> {
    let mut alternatives = Vec::new();
    let mut depth = 0usize;
    let mut alt_start = start;
    let mut i = start;

    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' => {
                let (_, end) = translate_class(chars, i)?;
                i = end;
            }
            '(' | '{' => depth += 1,
            c if c == close && depth == 0 => {
                alternatives.push(&chars[alt_start..i]);
                return Ok((alternatives, i));
            }
            ')' | '}' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                alternatives.push(&chars[alt_start..i]);
                alt_start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    Err(format!("unterminated group, expected '{close}'"))
}

/// Translate a character class starting at `start` (the `[`).
///
/// Returns the regex class and the index of the closing `]`.
fn translate_class(chars: &[char], start: usize) -> Result<(String, usize), String> {
    let mut i = start + 1;
    let mut class = String::from("[");

    if matches!(chars.get(i), Some('!' | '^')) {
        class.push_str("^/");
        i += 1;
    }

    let body_start = i;
    while i < chars.len() {
        let c = chars[i];
        if c == ']' && i > body_start {
            class.push(']');
            return Ok((class, i));
        }
        match c {
            '\\' | '[' | ']' | '^' | '&' | '~' => {
                class.push('\\');
                class.push(c);
            }
            _ => class.push(c),
        }
        i += 1;
    }

    Err("unterminated character class".to_owned())
}
