use miette::Diagnostic;
use thiserror::Error;

/// Why a resolution run failed. Every variant aborts the run; no partial
/// graph is ever returned.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    /// A range matched none of the published versions.
    #[error("no published version of `{name}` satisfies `{range}`")]
    #[diagnostic(
        code(kiln::resolve::no_version),
        help("Check the range in Kiln.toml or the versions available in the registry")
    )]
    NoSatisfyingVersion { name: String, range: String },

    /// The version oracle failed (network, parse, unknown package version).
    #[error("version oracle failed: {message}")]
    #[diagnostic(code(kiln::resolve::oracle))]
    OracleFailure { message: String },

    /// No selection of versions honors every range at once.
    #[error("conflicting version constraints on {}", .names.join(", "))]
    #[diagnostic(code(kiln::resolve::conflict))]
    ConflictingConstraints {
        names: Vec<String>,
        #[help]
        report: Option<String>,
    },

    /// A resolver invariant was broken. Always a bug, never user input.
    #[error("internal resolver error: {message}")]
    #[diagnostic(code(kiln::resolve::internal))]
    Internal { message: String },
}

impl ResolveError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_version_display() {
        let err = ResolveError::NoSatisfyingVersion {
            name: "x".to_string(),
            range: ">=2.0,<3.0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no published version of `x` satisfies `>=2.0,<3.0`"
        );
    }

    #[test]
    fn conflict_display_lists_names() {
        let err = ResolveError::ConflictingConstraints {
            names: vec!["a".to_string(), "c".to_string()],
            report: None,
        };
        assert_eq!(err.to_string(), "conflicting version constraints on a, c");
    }
}
