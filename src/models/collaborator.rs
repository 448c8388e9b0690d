//! Collaborator model from the co-authorship graph.

use serde::{Deserialize, Serialize};

/// An author suggested as a potential collaborator for a topic
///
/// Produced by the service's co-authorship graph: the author's name and how
/// many of their papers touch the queried topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaborator {
    /// Author display name
    pub author: String,

    /// Number of matching papers
    pub papers: u32,
}

impl Collaborator {
    /// Create a new collaborator entry
    pub fn new(author: impl Into<String>, papers: u32) -> Self {
        Self {
            author: author.into(),
            papers,
        }
    }
}
