//! Per-session view state for the interactive console.
//!
//! A [`ViewModel`] is one page instance: the four operation slots, the
//! display region each one writes, the current search-result list, and the
//! open paper detail. All methods are synchronous; the console event loop is
//! the only place completions are awaited, so every state transition happens
//! on one task and the slots never race each other.
//!
//! The analyze slot is the exception to fire-and-apply: its completion is
//! only applied when the detail view it was launched from is still the one
//! on screen. [`ViewModel::open_detail`] bumps a generation counter each
//! time it replaces the detail, [`ViewModel::begin_analyze`] captures the
//! current value, and [`ViewModel::finish_analyze`] drops the response on a
//! mismatch instead of rendering it.

use crate::models::{Analysis, Collaborator, Paper};
use crate::ops::{
    Analyze, Collaborate, Controller, Ingest, OperationError, OperationStatus, Search,
};
use crate::render::{self, Fragment};

/// The open paper detail and the analysis rendered into it
#[derive(Debug, Clone)]
pub struct DetailView {
    paper: Paper,
    generation: u64,
    view: Fragment,
    analysis: Fragment,
}

impl DetailView {
    /// The paper this view was opened on
    pub fn paper(&self) -> &Paper {
        &self.paper
    }

    /// Generation stamp of this view; analyze completions carrying an older
    /// stamp are discarded
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rendered detail lines
    pub fn view(&self) -> &Fragment {
        &self.view
    }

    /// Rendered analysis region (empty until an analyze resolves)
    pub fn analysis(&self) -> &Fragment {
        &self.analysis
    }
}

/// State of one console session
#[derive(Debug, Default)]
pub struct ViewModel {
    ingest: Controller,
    search: Controller,
    collaborate: Controller,
    analyze: Controller,

    ingest_region: Fragment,
    search_region: Fragment,
    collaborators_region: Fragment,

    papers: Vec<Paper>,
    detail: Option<DetailView>,
    generation: u64,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Ingest =====

    /// Start an ingest: validate, then mark the region as running
    pub fn begin_ingest(&mut self, op: &Ingest) -> Result<(), OperationError> {
        match self.ingest.trigger(op) {
            Ok(()) => {
                self.ingest_region =
                    render::loading(format!("Ingesting papers on '{}'...", op.query));
                Ok(())
            }
            Err(e) => {
                self.ingest_region = render::failure(&e);
                Err(e)
            }
        }
    }

    /// Apply an ingest outcome; only the count is reported
    pub fn finish_ingest(&mut self, outcome: Result<Vec<Paper>, OperationError>) {
        self.ingest.resolve(&outcome);
        self.ingest_region = match outcome {
            Ok(papers) => render::success(format!(
                "Successfully ingested {} paper(s).",
                papers.len()
            )),
            Err(e) => render::failure(format!("Error: {}", e)),
        };
    }

    // ===== Search =====

    /// Start a search; the current result list is dropped once the trigger
    /// is accepted, so no stale item can be opened while the call runs
    pub fn begin_search(&mut self, op: &Search) -> Result<(), OperationError> {
        match self.search.trigger(op) {
            Ok(()) => {
                self.papers.clear();
                self.search_region = render::loading("Searching...");
                Ok(())
            }
            Err(e) => {
                self.search_region = render::failure(&e);
                Err(e)
            }
        }
    }

    /// Apply a search outcome: wholesale replacement of the result list
    pub fn finish_search(&mut self, outcome: Result<Vec<Paper>, OperationError>) {
        self.search.resolve(&outcome);
        match outcome {
            Ok(papers) => {
                self.papers = papers;
                self.search_region = render::search_results(&self.papers);
            }
            Err(e) => {
                self.search_region = render::failure(format!("Error: {}", e));
            }
        }
    }

    // ===== Collaborators =====

    /// Start a collaborator lookup
    pub fn begin_collaborate(&mut self, op: &Collaborate) -> Result<(), OperationError> {
        match self.collaborate.trigger(op) {
            Ok(()) => {
                self.collaborators_region = render::loading("Finding experts...");
                Ok(())
            }
            Err(e) => {
                self.collaborators_region = render::failure(&e);
                Err(e)
            }
        }
    }

    /// Apply a collaborator outcome; rows render in API order and are not
    /// retained afterwards, nothing binds to them
    pub fn finish_collaborate(&mut self, outcome: Result<Vec<Collaborator>, OperationError>) {
        self.collaborate.resolve(&outcome);
        self.collaborators_region = match outcome {
            Ok(rows) => render::collaborators(&rows),
            Err(e) => render::failure(format!("Error: {}", e)),
        };
    }

    // ===== Detail + analyze =====

    /// Open the detail view for result item `index` (1-based, as rendered)
    ///
    /// Resolves positionally against the current list: the bound element is
    /// whatever sits at that slot, regardless of title collisions. Replacing
    /// the detail bumps the generation and clears any rendered analysis.
    pub fn open_detail(&mut self, index: usize) -> Option<&DetailView> {
        let paper = self.papers.get(index.checked_sub(1)?)?.clone();
        self.generation += 1;
        let view = render::paper_detail(&paper);
        self.detail = Some(DetailView {
            paper,
            generation: self.generation,
            view,
            analysis: Fragment::new(),
        });
        self.detail.as_ref()
    }

    /// Start an analyze for the open detail view
    ///
    /// Returns the operation to run and the generation stamp its completion
    /// must carry; `None` when no detail is open (the action does not exist
    /// without one).
    pub fn begin_analyze(&mut self) -> Option<(Analyze, u64)> {
        let detail = self.detail.as_mut()?;
        let op = Analyze::new(detail.paper.id.clone());
        // Analyze carries no validation, the trigger cannot fail
        let _ = self.analyze.trigger(&op);
        detail.analysis = render::loading("Analyzing with AI...");
        Some((op, detail.generation))
    }

    /// Apply an analyze outcome for generation `generation`
    ///
    /// The slot resolves either way; the response is only rendered when the
    /// detail it was launched from is still open. Returns whether the
    /// outcome was applied.
    pub fn finish_analyze(
        &mut self,
        generation: u64,
        outcome: Result<Analysis, OperationError>,
    ) -> bool {
        self.analyze.resolve(&outcome);

        let Some(detail) = self.detail.as_mut() else {
            tracing::debug!(generation, "discarding analysis, detail view is gone");
            return false;
        };
        if detail.generation != generation {
            tracing::debug!(
                stale = generation,
                current = detail.generation,
                "discarding stale analysis response"
            );
            return false;
        }

        detail.analysis = match outcome {
            Ok(analysis) => render::analysis(&analysis),
            Err(e) => render::failure(format!("AI analysis failed: {}", e)),
        };
        true
    }

    // ===== Read access =====

    pub fn ingest_region(&self) -> &Fragment {
        &self.ingest_region
    }

    pub fn search_region(&self) -> &Fragment {
        &self.search_region
    }

    pub fn collaborators_region(&self) -> &Fragment {
        &self.collaborators_region
    }

    /// The list search results resolve against
    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn ingest_status(&self) -> OperationStatus {
        self.ingest.status()
    }

    pub fn search_status(&self) -> OperationStatus {
        self.search.status()
    }

    pub fn collaborate_status(&self) -> OperationStatus {
        self.collaborate.status()
    }

    pub fn analyze_status(&self) -> OperationStatus {
        self.analyze.status()
    }
}
