// error.rs - Failure conditions surfaced by the simulation and analysis routines

use thiserror::Error;

/// Errors produced by graph construction, the growth/equilibrium loops and
/// the analysis utilities.
///
/// These are deterministic precondition violations, not transient faults:
/// there is no retry policy, the caller is expected to fix the input.
#[derive(Debug, Error, PartialEq)]
pub enum PrestigeError {
    /// A caller-supplied parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An operation that needs a connected graph (geodesic measurement,
    /// distance-weighted partner selection) ran on a disconnected one.
    #[error("graph is disconnected")]
    Disconnected,

    /// Power iteration for eigenvector centrality did not settle within its
    /// iteration budget.
    #[error("eigenvector centrality failed to converge after {iterations} iterations")]
    ConvergenceFailure { iterations: usize },

    /// Every candidate weight was zero during a weighted draw, so no partner
    /// can be selected (e.g. the graph is complete or too small).
    #[error("no eligible partner: all selection weights are zero")]
    DegenerateSelection,
}

/// Shorthand used throughout the crate.
pub type Result<T> = std::result::Result<T, PrestigeError>;
