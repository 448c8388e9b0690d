//! Core data models for the discovery service's JSON payloads.

mod analysis;
mod collaborator;
mod paper;

pub use analysis::Analysis;
pub use collaborator::Collaborator;
pub use paper::{Author, Paper, PaperBuilder};
