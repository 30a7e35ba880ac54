//! Lenient version parsing and ordering.
//!
//! Registry versions are not guaranteed to be strict semver, so any string
//! parses:
//! - Segments are split on `.` and `-`; anything after `+` is build metadata
//!   and ignored for ordering
//! - Numeric segments compare as numbers, and trailing zeros are
//!   insignificant (`1.0 == 1.0.0`)
//! - Pre-release qualifiers sort before the release:
//!   `dev` < `alpha` < `beta` < `rc` < `""` (release)
//! - Unknown text segments sort after known pre-release qualifiers but
//!   before numbers

use std::cmp::Ordering;
use std::fmt;

/// A parsed version with comparable segments.
#[derive(Debug, Clone)]
pub struct Version {
    original: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    Numeric(u64),
    Qualifier(Qualifier),
    Text(String),
}

/// Well-known pre-release qualifiers with defined ordering.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
enum Qualifier {
    Dev,
    Alpha,
    Beta,
    Rc,
}

impl Version {
    pub fn parse(version: &str) -> Self {
        let trimmed = version.trim();
        let without_build = trimmed.split_once('+').map_or(trimmed, |(v, _)| v);
        let without_prefix = without_build.strip_prefix('v').unwrap_or(without_build);
        Self {
            original: trimmed.to_string(),
            segments: parse_segments(without_prefix),
        }
    }

    /// The version string exactly as it was published (trimmed).
    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.segments.len().max(other.segments.len());
        for i in 0..max_len {
            let ord = compare_segments(self.segments.get(i), other.segments.get(i));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_segments(a: Option<&Segment>, b: Option<&Segment>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(s), None) => compare_to_missing(s),
        (None, Some(s)) => compare_to_missing(s).reverse(),
        (Some(a), Some(b)) => compare_present(a, b),
    }
}

/// A missing segment behaves like `0` against numbers and like a release
/// against qualifiers, so `1.0-rc < 1.0` and `1.0 == 1.0.0`.
fn compare_to_missing(seg: &Segment) -> Ordering {
    match seg {
        Segment::Numeric(n) => n.cmp(&0),
        Segment::Qualifier(_) | Segment::Text(_) => Ordering::Less,
    }
}

fn compare_present(a: &Segment, b: &Segment) -> Ordering {
    match (a, b) {
        (Segment::Numeric(a), Segment::Numeric(b)) => a.cmp(b),
        (Segment::Qualifier(a), Segment::Qualifier(b)) => a.cmp(b),
        (Segment::Text(a), Segment::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        (Segment::Numeric(_), _) => Ordering::Greater,
        (_, Segment::Numeric(_)) => Ordering::Less,
        (Segment::Qualifier(_), Segment::Text(_)) => Ordering::Less,
        (Segment::Text(_), Segment::Qualifier(_)) => Ordering::Greater,
    }
}

fn parse_segments(version: &str) -> Vec<Segment> {
    version
        .split(['.', '-'])
        .filter(|token| !token.is_empty())
        .flat_map(split_alnum)
        .map(classify)
        .collect()
}

/// Split `rc1` into `rc` and `1` so that `1.0-rc1 < 1.0-rc2 < 1.0-rc10`.
fn split_alnum(token: &str) -> Vec<&str> {
    match token.find(|c: char| c.is_ascii_digit()) {
        Some(pos) if pos > 0 && token[pos..].chars().all(|c| c.is_ascii_digit()) => {
            vec![&token[..pos], &token[pos..]]
        }
        _ => vec![token],
    }
}

fn classify(token: &str) -> Segment {
    if let Ok(n) = token.parse::<u64>() {
        return Segment::Numeric(n);
    }
    match token.to_lowercase().as_str() {
        "dev" | "pre" => Segment::Qualifier(Qualifier::Dev),
        "alpha" | "a" => Segment::Qualifier(Qualifier::Alpha),
        "beta" | "b" => Segment::Qualifier(Qualifier::Beta),
        "rc" | "cr" => Segment::Qualifier(Qualifier::Rc),
        _ => Segment::Text(token.to_string()),
    }
}
