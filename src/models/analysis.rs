//! AI analysis model.

use serde::{Deserialize, Serialize};

/// AI-generated analysis of a single paper
///
/// The service's analysis rows carry more fields than the client shows
/// (status, timings, extra extractions); only the three lists below are
/// decoded, and each defaults to empty when the payload omits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analysis {
    /// Key findings extracted from the abstract
    #[serde(default)]
    pub findings: Vec<String>,

    /// Methods the paper applies
    #[serde(default)]
    pub methods: Vec<String>,

    /// Research gaps the model identified
    #[serde(default)]
    pub gaps: Vec<String>,
}

impl Analysis {
    /// Whether all three lists are empty
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty() && self.methods.is_empty() && self.gaps.is_empty()
    }
}
