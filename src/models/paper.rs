//! Paper model matching the discovery service's JSON payloads.

use serde::{Deserialize, Serialize};

/// A single author entry as the service stores it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    /// Author display name
    pub name: String,
}

impl Author {
    /// Create a new author
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A research paper as returned by the discovery service
///
/// The same struct covers every endpoint that returns papers. Search hits
/// come from the index's `_source` and may omit the document id, so `id`
/// defaults to empty; the remaining optional fields are simply absent on
/// sparse index entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    /// Service-side document identifier
    #[serde(default)]
    pub id: String,

    /// Paper title
    pub title: String,

    /// Authors, in the order the service stores them
    pub authors: Option<Vec<Author>>,

    /// Journal name
    pub journal: Option<String>,

    /// Publication year
    pub year: Option<i32>,

    /// Abstract text
    pub r#abstract: Option<String>,
}

impl Paper {
    /// Create a paper with required fields only
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: None,
            journal: None,
            year: None,
            r#abstract: None,
        }
    }

    /// Author names joined with ", ", or `None` when the author list is absent
    ///
    /// An empty list still yields `Some("")`: the service distinguishes
    /// "no author data" from "zero authors recorded".
    pub fn author_names(&self) -> Option<String> {
        self.authors.as_ref().map(|authors| {
            authors
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
    }
}

/// Builder for constructing Paper objects
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Create a new builder with required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            paper: Paper::new(id, title),
        }
    }

    /// Set authors from a list of names
    pub fn authors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paper.authors = Some(names.into_iter().map(Author::new).collect());
        self
    }

    /// Set journal
    pub fn journal(mut self, journal: impl Into<String>) -> Self {
        self.paper.journal = Some(journal.into());
        self
    }

    /// Set publication year
    pub fn year(mut self, year: i32) -> Self {
        self.paper.year = Some(year);
        self
    }

    /// Set abstract
    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.paper.r#abstract = Some(abstract_text.into());
        self
    }

    /// Build the Paper
    pub fn build(self) -> Paper {
        self.paper
    }
}
