//! Pure renderers that turn response models into displayable fragments.
//!
//! A [`Fragment`] is an ordered list of plain-text lines. Renderers are free
//! functions with no state of their own: the same input always yields the
//! same fragment, and callers decide where the lines go (the console prints
//! them, tests compare them). Item numbering in the search renderer doubles
//! as the activation binding: the console resolves `open N` positionally
//! against the list the fragment was rendered from.
//!
//! Status lines carry a leading glyph (`◐` running, `✓` success, `✗`
//! failure) so downstream printing can colorize without re-parsing the
//! message.

use std::fmt;

use crate::models::{Analysis, Collaborator, Paper};

/// Line shown when a search succeeds with zero hits
pub const NO_RESULTS: &str = "No results found.";

/// Line shown when a collaborator lookup succeeds with zero rows
pub const NO_COLLABORATORS: &str = "No potential collaborators found.";

/// Placeholder for absent detail fields
pub const NOT_AVAILABLE: &str = "N/A";

/// Label of the analyze action on the detail view
pub const ANALYZE_LABEL: &str = "Analyze with AI";

/// An ordered run of display lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    lines: Vec<String>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment holding a single line
    pub fn from_line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
        }
    }

    /// Append one line
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

/// Status line for an operation still in flight
pub fn loading(message: impl fmt::Display) -> Fragment {
    Fragment::from_line(format!("◐ {}", message))
}

/// Status line for a completed operation
pub fn success(message: impl fmt::Display) -> Fragment {
    Fragment::from_line(format!("✓ {}", message))
}

/// Status line for a failed operation
pub fn failure(message: impl fmt::Display) -> Fragment {
    Fragment::from_line(format!("✗ {}", message))
}

/// Render search hits as a numbered list
///
/// Zero hits renders exactly the [`NO_RESULTS`] line and nothing else. Item
/// numbers start at 1 and are the handles `open N` resolves against the
/// current list, so ordering must follow the input slice.
pub fn search_results(papers: &[Paper]) -> Fragment {
    if papers.is_empty() {
        return Fragment::from_line(NO_RESULTS);
    }
    let mut fragment = Fragment::new();
    for (index, paper) in papers.iter().enumerate() {
        fragment.push(format!("{}. {}", index + 1, paper.title));
    }
    fragment
}

/// Render collaborator rows in the order the service returned them
pub fn collaborators(rows: &[Collaborator]) -> Fragment {
    if rows.is_empty() {
        return Fragment::from_line(NO_COLLABORATORS);
    }
    let mut fragment = Fragment::new();
    for row in rows {
        fragment.push(format!("{} ({} paper(s))", row.author, row.papers));
    }
    fragment
}

/// Render the full detail view of one paper
///
/// Present fields are reproduced verbatim; each absent field falls back to
/// [`NOT_AVAILABLE`] independently of the others. The trailing line names
/// the analyze action bound to this view.
pub fn paper_detail(paper: &Paper) -> Fragment {
    let mut fragment = Fragment::new();
    fragment.push(paper.title.clone());
    fragment.push(format!(
        "Authors: {}",
        paper
            .author_names()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    ));
    fragment.push(format!(
        "Journal: {} | Year: {}",
        paper.journal.as_deref().unwrap_or(NOT_AVAILABLE),
        paper
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    ));
    fragment.push(format!(
        "Abstract: {}",
        paper.r#abstract.as_deref().unwrap_or(NOT_AVAILABLE)
    ));
    fragment.push(format!("[analyze] {}", ANALYZE_LABEL));
    fragment
}

/// Render an AI analysis as three labeled lists
///
/// All three labels appear even when their lists are empty; items render as
/// `- ` lines under their label.
pub fn analysis(analysis: &Analysis) -> Fragment {
    let mut fragment = Fragment::new();
    labeled_list(&mut fragment, "Key Findings", &analysis.findings);
    labeled_list(&mut fragment, "Methods Used", &analysis.methods);
    labeled_list(&mut fragment, "Research Gaps", &analysis.gaps);
    fragment
}

fn labeled_list(fragment: &mut Fragment, label: &str, items: &[String]) {
    fragment.push(label);
    for item in items {
        fragment.push(format!("- {}", item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaperBuilder;

    #[test]
    fn test_empty_search_renders_no_results_line_only() {
        let fragment = search_results(&[]);
        assert_eq!(fragment.lines(), &[NO_RESULTS.to_string()]);
    }

    #[test]
    fn test_search_results_are_numbered_from_one() {
        let papers = vec![
            Paper::new("a", "First Paper"),
            Paper::new("b", "Second Paper"),
            Paper::new("c", "First Paper"),
        ];
        let fragment = search_results(&papers);
        assert_eq!(
            fragment.lines(),
            &[
                "1. First Paper".to_string(),
                "2. Second Paper".to_string(),
                "3. First Paper".to_string(),
            ]
        );
    }

    #[test]
    fn test_search_renderer_is_idempotent() {
        let papers = vec![Paper::new("a", "Stable Title")];
        assert_eq!(search_results(&papers), search_results(&papers));
        assert_eq!(search_results(&[]), search_results(&[]));
    }

    #[test]
    fn test_collaborators_single_row() {
        let rows = vec![Collaborator::new("A. Smith", 5)];
        let fragment = collaborators(&rows);
        assert_eq!(fragment.lines(), &["A. Smith (5 paper(s))".to_string()]);
    }

    #[test]
    fn test_collaborators_empty_and_ordered() {
        assert_eq!(
            collaborators(&[]).lines(),
            &[NO_COLLABORATORS.to_string()]
        );

        let rows = vec![
            Collaborator::new("B. Jones", 1),
            Collaborator::new("A. Smith", 9),
        ];
        let fragment = collaborators(&rows);
        assert_eq!(
            fragment.lines(),
            &[
                "B. Jones (1 paper(s))".to_string(),
                "A. Smith (9 paper(s))".to_string(),
            ]
        );
    }

    #[test]
    fn test_paper_detail_with_all_fields() {
        let paper = PaperBuilder::new("p-1", "Gene Editing Advances")
            .authors(["A. Smith", "B. Jones"])
            .journal("Nature")
            .year(2023)
            .abstract_text("CRISPR applications in vivo.")
            .build();

        let fragment = paper_detail(&paper);
        assert_eq!(
            fragment.lines(),
            &[
                "Gene Editing Advances".to_string(),
                "Authors: A. Smith, B. Jones".to_string(),
                "Journal: Nature | Year: 2023".to_string(),
                "Abstract: CRISPR applications in vivo.".to_string(),
                "[analyze] Analyze with AI".to_string(),
            ]
        );
    }

    #[test]
    fn test_paper_detail_absent_fields_fall_back_independently() {
        let paper = Paper::new("p-2", "Sparse Entry");
        let fragment = paper_detail(&paper);
        assert_eq!(
            fragment.lines(),
            &[
                "Sparse Entry".to_string(),
                "Authors: N/A".to_string(),
                "Journal: N/A | Year: N/A".to_string(),
                "Abstract: N/A".to_string(),
                "[analyze] Analyze with AI".to_string(),
            ]
        );

        let paper = PaperBuilder::new("p-3", "Half Known").year(2020).build();
        let fragment = paper_detail(&paper);
        assert_eq!(fragment.lines()[2], "Journal: N/A | Year: 2020");
    }

    #[test]
    fn test_analysis_labels_always_present() {
        let empty = Analysis::default();
        let fragment = analysis(&empty);
        assert_eq!(
            fragment.lines(),
            &[
                "Key Findings".to_string(),
                "Methods Used".to_string(),
                "Research Gaps".to_string(),
            ]
        );
    }

    #[test]
    fn test_analysis_items_listed_under_labels() {
        let full = Analysis {
            findings: vec!["Finding one".to_string(), "Finding two".to_string()],
            methods: vec!["RNA-seq".to_string()],
            gaps: vec![],
        };
        let fragment = analysis(&full);
        assert_eq!(
            fragment.lines(),
            &[
                "Key Findings".to_string(),
                "- Finding one".to_string(),
                "- Finding two".to_string(),
                "Methods Used".to_string(),
                "- RNA-seq".to_string(),
                "Research Gaps".to_string(),
            ]
        );
    }

    #[test]
    fn test_status_line_glyphs() {
        assert_eq!(loading("Searching...").to_string(), "◐ Searching...");
        assert_eq!(
            success("Successfully ingested 3 paper(s).").to_string(),
            "✓ Successfully ingested 3 paper(s)."
        );
        assert_eq!(
            failure("Error: An API error occurred").to_string(),
            "✗ Error: An API error occurred"
        );
    }

    #[test]
    fn test_fragment_display_joins_lines() {
        let mut fragment = Fragment::new();
        assert!(fragment.is_empty());
        fragment.push("one");
        fragment.push("two");
        assert_eq!(fragment.to_string(), "one\ntwo");
    }
}
