pub mod engine;

pub use engine::{MatchConfig, MatchEngine, MatchQuery, RideMatch};
