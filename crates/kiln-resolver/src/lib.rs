//! SAT-based dependency resolution.
//!
//! Given root requirements and a [`VersionOracle`], the resolver gathers
//! every reachable candidate version, encodes "one version per package, and
//! every selected package's ranges honored" as CNF, hands it to a
//! [`SatEngine`] and maps the model back to a [`ResolvedGraph`].

pub mod assemble;
pub mod cache;
pub mod candidate;
pub mod cnf;
pub mod conflict;
pub mod error;
pub mod gather;
pub mod graph;
pub mod interval;
pub mod oracle;
pub mod resolver;
pub mod sat;
pub mod version;

pub use candidate::{CandidateList, CandidateNode, PackageId, PackageRequest, VersionRange};
pub use conflict::ConflictReport;
pub use error::ResolveError;
pub use graph::{DependencyGraph, ResolvedGraph, ResolvedPackage};
pub use interval::Interval;
pub use oracle::{IndexOracle, VersionOracle};
pub use resolver::{resolve, Resolution, ResolutionStats, ResolveOptions, Resolver};
pub use sat::{SatEngine, SatError, VarisatEngine};
pub use version::Version;
