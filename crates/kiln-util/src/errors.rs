use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for Kiln operations outside the resolver core.
#[derive(Debug, Error, Diagnostic)]
pub enum KilnError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed manifest (`Kiln.toml`).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your Kiln.toml for syntax errors"))]
    Manifest { message: String },

    /// Unreadable or inconsistent lockfile (`Kiln.lock`).
    #[error("Lockfile error: {message}")]
    #[diagnostic(help("Run `kiln lock` to regenerate Kiln.lock"))]
    Lockfile { message: String },

    /// The registry index could not be located, read or parsed.
    #[error("Registry error: {message}")]
    Registry { message: String },

    /// Network request failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Global configuration could not be read or parsed.
    #[error("Config error: {message}")]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type KilnResult<T> = miette::Result<T>;
