//! Version interval expressions.
//!
//! Supported forms:
//! - `*` or an empty string: any version
//! - `1.2.0` or `=1.2.0`: exactly that version
//! - comparators `>=`, `>`, `<=`, `<`, `=` joined by `and` or `,`, all of
//!   which must hold: `>=1.2.0 and <2.0.0`, `>=1.0,<2.0`

use std::fmt;

use thiserror::Error;

use crate::version::Version;

/// A malformed interval expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntervalError {
    #[error("empty comparator in `{0}`")]
    EmptyComparator(String),

    #[error("comparator `{comparator}` in `{expr}` is missing a version")]
    MissingVersion { expr: String, comparator: String },

    #[error("`*` cannot be combined with other comparators in `{0}`")]
    WildcardCombined(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Op::Ge => ">=",
            Op::Gt => ">",
            Op::Le => "<=",
            Op::Lt => "<",
            Op::Eq => "=",
        }
    }
}

#[derive(Debug, Clone)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn matches(&self, version: &Version) -> bool {
        match self.op {
            Op::Ge => version >= &self.version,
            Op::Gt => version > &self.version,
            Op::Le => version <= &self.version,
            Op::Lt => version < &self.version,
            Op::Eq => version == &self.version,
        }
    }
}

/// A parsed interval: the conjunction of its comparators. No comparators
/// means any version matches.
#[derive(Debug, Clone)]
pub struct Interval {
    comparators: Vec<Comparator>,
}

impl Interval {
    pub fn parse(expr: &str) -> Result<Self, IntervalError> {
        let trimmed = expr.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Ok(Self::any());
        }

        let mut comparators = Vec::new();
        for part in split_conjunction(trimmed) {
            let part = part.trim();
            if part.is_empty() {
                return Err(IntervalError::EmptyComparator(expr.to_string()));
            }
            if part == "*" {
                return Err(IntervalError::WildcardCombined(expr.to_string()));
            }
            comparators.push(parse_comparator(expr, part)?);
        }
        Ok(Self { comparators })
    }

    /// The interval matching every version.
    pub fn any() -> Self {
        Self {
            comparators: Vec::new(),
        }
    }

    pub fn satisfies(&self, version: &Version) -> bool {
        self.comparators.iter().all(|c| c.matches(version))
    }

    /// Convenience for callers holding raw version strings.
    pub fn satisfies_str(&self, version: &str) -> bool {
        self.satisfies(&Version::parse(version))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.comparators.is_empty() {
            return f.write_str("*");
        }
        let parts: Vec<String> = self
            .comparators
            .iter()
            .map(|c| format!("{}{}", c.op.symbol(), c.version))
            .collect();
        f.write_str(&parts.join(" and "))
    }
}

fn split_conjunction(expr: &str) -> Vec<&str> {
    expr.split(',')
        .flat_map(|chunk| chunk.split(" and "))
        .collect()
}

fn parse_comparator(expr: &str, part: &str) -> Result<Comparator, IntervalError> {
    let (op, rest) = if let Some(rest) = part.strip_prefix(">=") {
        (Op::Ge, rest)
    } else if let Some(rest) = part.strip_prefix("<=") {
        (Op::Le, rest)
    } else if let Some(rest) = part.strip_prefix('>') {
        (Op::Gt, rest)
    } else if let Some(rest) = part.strip_prefix('<') {
        (Op::Lt, rest)
    } else if let Some(rest) = part.strip_prefix('=') {
        (Op::Eq, rest.strip_prefix('=').unwrap_or(rest))
    } else {
        (Op::Eq, part)
    };

    let rest = rest.trim();
    if rest.is_empty() {
        return Err(IntervalError::MissingVersion {
            expr: expr.to_string(),
            comparator: part.to_string(),
        });
    }
    Ok(Comparator {
        op,
        version: Version::parse(rest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sat(expr: &str, version: &str) -> bool {
        Interval::parse(expr).unwrap().satisfies_str(version)
    }

    #[test]
    fn wildcard_matches_everything() {
        assert!(sat("*", "0.0.1"));
        assert!(sat("", "99.0"));
    }

    #[test]
    fn exact_version() {
        assert!(sat("1.5", "1.5.0"));
        assert!(sat("=1.5", "1.5"));
        assert!(sat("==1.5", "1.5"));
        assert!(!sat("1.5", "1.6"));
    }

    #[test]
    fn and_conjunction() {
        let expr = ">=1.2.0 and <2.0.0";
        assert!(sat(expr, "1.2.0"));
        assert!(sat(expr, "1.9.9"));
        assert!(!sat(expr, "2.0.0"));
        assert!(!sat(expr, "1.1.9"));
    }

    #[test]
    fn comma_conjunction() {
        assert!(sat(">=1.0,<2.0", "1.5"));
        assert!(!sat(">=1.0,<2.0", "2.0"));
        assert!(!sat(">=2.0, <3.0", "1.5"));
    }

    #[test]
    fn strict_bounds() {
        assert!(!sat(">1.0", "1.0"));
        assert!(sat(">1.0", "1.0.1"));
        assert!(sat("<=1.0", "1.0.0"));
        assert!(sat("<1.0", "1.0-rc.1"));
    }

    #[test]
    fn missing_version_rejected() {
        let err = Interval::parse(">=1.0 and <").unwrap_err();
        assert!(matches!(err, IntervalError::MissingVersion { .. }));
    }

    #[test]
    fn empty_comparator_rejected() {
        let err = Interval::parse(">=1.0,,<2.0").unwrap_err();
        assert!(matches!(err, IntervalError::EmptyComparator(_)));
    }

    #[test]
    fn wildcard_cannot_be_combined() {
        let err = Interval::parse("* and <2.0").unwrap_err();
        assert!(matches!(err, IntervalError::WildcardCombined(_)));
    }

    #[test]
    fn display_normalizes() {
        let interval = Interval::parse(">=1.0,<2.0").unwrap();
        assert_eq!(interval.to_string(), ">=1.0 and <2.0");
        assert_eq!(Interval::any().to_string(), "*");
    }
}
