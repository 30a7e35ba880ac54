//! Shared utilities for the Kiln build tool.
//!
//! Cross-cutting concerns used by the other Kiln crates: the unified error
//! type, filesystem helpers, and terminal status lines and spinners.

pub mod errors;
pub mod fs;
pub mod progress;
