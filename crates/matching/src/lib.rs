//! `secretsanta-matching`: constrained gift-exchange matching engine.
//!
//! Pure engine crate: receives participants and prohibitions, returns a
//! giver -> receiver matching or `None` when none exists.
//! No CLI or IO dependencies.

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod greedy;
pub mod hopcroft_karp;
pub mod model;
pub mod rematch;
pub mod seed;
pub mod shuffle;

pub use audit::{verify_matching, DrawRecord, Violation};
pub use config::{GroupConfig, MatchingConfig};
pub use engine::{generate_matching, generate_matching_with};
pub use error::MatchingError;
pub use model::{Assignment, ForbiddenEdge, Matching, Participant};
pub use rematch::{partial_rematch, partial_rematch_with};
pub use seed::new_seed;
