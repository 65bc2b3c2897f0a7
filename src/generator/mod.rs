//! Placement generators.
//!
//! Both generators own a seeded sampler and draw from it in a fixed order,
//! so a seed reproduces the same placements on the same masks.

mod ai_marker;
mod config;
mod mex;
mod sampling;

pub use ai_marker::{line_of_sight, scatter, AiMarkerGenerator, MarkerSummary};
pub use config::{MarkerConfig, MexConfig};
pub use mex::{MexGenerator, MexSummary, MexTier, TierPlacement};
pub use sampling::{place_pairs, sample_pair, Exclusion};
