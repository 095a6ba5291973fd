pub mod centrality;
pub mod copula;
pub mod equilibrium;
pub mod error;
pub mod graph;
pub mod observables;
pub mod powerlaw;
pub mod prestige;
pub mod special;

pub use error::{PrestigeError, Result};
