//! Similarity profiles and breakpoint selection for semantic splitting.
//!
//! A profile has one value per gap between consecutive sentences: entry `i`
//! scores the gap between sentence `i` and `i + 1`. Breakpoints are gap
//! indices where the profile dips to a local minimum below a threshold.

mod breakpoints;
mod profile;

pub use breakpoints::{chunks_from_breakpoints, select, select_with_order, BreakpointSelection};
pub use profile::{activation_weights, cosine_similarity, profile, smooth};

#[cfg(test)]
mod tests;
