//! Discovery of sources the build model does not declare

pub mod coverage;
pub mod paths;
pub mod patterns;
mod walker;

pub use walker::{SourceWalker, WalkOutcome};
