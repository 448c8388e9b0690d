//! Interactive console session against one [`ViewModel`].
//!
//! The loop is single-threaded in the state-machine sense: operations run on
//! spawned tasks, but their results come back as [`Completion`] messages
//! over an mpsc channel, and only this loop applies them. `tokio::select!`
//! multiplexes stdin lines and completions, so a command can be typed while
//! three calls are still in flight and every transition still happens here.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::api::{ApiClient, ApiResult};
use crate::models::{Analysis, Collaborator, Paper};
use crate::ops::{Collaborate, Ingest, Operation, OperationError, Search};
use crate::ui;
use crate::view::ViewModel;

/// Result of one spawned operation, routed back to the loop
#[derive(Debug)]
enum Completion {
    Ingest(ApiResult<Vec<Paper>>),
    Search(ApiResult<Vec<Paper>>),
    Collaborate(ApiResult<Vec<Collaborator>>),
    Analyze {
        generation: u64,
        outcome: ApiResult<Analysis>,
    },
}

/// Interactive session state: the view, the client, and the channel the
/// spawned calls report back on
pub struct Console {
    api: ApiClient,
    view: ViewModel,
    source: String,
    max_results: u32,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl Console {
    pub fn new(api: ApiClient, source: impl Into<String>, max_results: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            view: ViewModel::new(),
            source: source.into(),
            max_results,
            tx,
            rx,
        }
    }

    /// Run the session until `quit` or stdin closes
    pub async fn run(mut self) -> std::io::Result<()> {
        println!(
            "SciPaper console (source: {}). Type 'help' for commands, 'quit' to exit.",
            self.source
        );
        self.prompt();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if !self.handle_line(line.trim()) {
                                break;
                            }
                            self.prompt();
                        }
                        None => break,
                    }
                }
                Some(completion) = self.rx.recv() => {
                    self.apply(completion);
                    self.prompt();
                }
            }
        }
        Ok(())
    }

    /// Dispatch one input line; returns false when the session should end
    fn handle_line(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return true;
        }
        let (command, rest) = split_command(line);
        match command {
            "ingest" | "i" => self.trigger_ingest(rest),
            "search" | "s" => self.trigger_search(rest),
            "collab" | "collaborators" | "c" => self.trigger_collaborate(rest),
            "open" | "o" => self.open_detail(rest),
            "analyze" | "a" => self.trigger_analyze(),
            "source" => self.set_source(rest),
            "show" => self.show(),
            "help" | "?" => self.help(),
            "quit" | "exit" | "q" => return false,
            _ => println!("Unknown command: {} (try 'help')", command),
        }
        true
    }

    fn trigger_ingest(&mut self, query: &str) {
        let op = Ingest::new(query, self.source.clone()).max_results(self.max_results);
        let accepted = self.view.begin_ingest(&op).is_ok();
        ui::print_fragment(self.view.ingest_region());
        if accepted {
            let api = self.api.clone();
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(Completion::Ingest(op.call(&api).await));
            });
        }
    }

    fn trigger_search(&mut self, query: &str) {
        let op = Search::new(query);
        let accepted = self.view.begin_search(&op).is_ok();
        ui::print_fragment(self.view.search_region());
        if accepted {
            let api = self.api.clone();
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(Completion::Search(op.call(&api).await));
            });
        }
    }

    fn trigger_collaborate(&mut self, topic: &str) {
        let op = Collaborate::new(topic);
        let accepted = self.view.begin_collaborate(&op).is_ok();
        ui::print_fragment(self.view.collaborators_region());
        if accepted {
            let api = self.api.clone();
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(Completion::Collaborate(op.call(&api).await));
            });
        }
    }

    fn open_detail(&mut self, arg: &str) {
        let index = match arg.parse::<usize>() {
            Ok(index) => index,
            Err(_) => {
                println!("Usage: open <number>");
                return;
            }
        };
        match self.view.open_detail(index) {
            Some(detail) => ui::print_fragment(detail.view()),
            None => println!("No result item {}.", index),
        }
    }

    fn trigger_analyze(&mut self) {
        let Some((op, generation)) = self.view.begin_analyze() else {
            println!("Open a paper first (open <number>).");
            return;
        };
        if let Some(detail) = self.view.detail() {
            ui::print_fragment(detail.analysis());
        }
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = op.call(&api).await;
            let _ = tx.send(Completion::Analyze {
                generation,
                outcome,
            });
        });
    }

    /// Apply one completion to the view and reprint the affected region
    fn apply(&mut self, completion: Completion) {
        println!();
        match completion {
            Completion::Ingest(outcome) => {
                self.view
                    .finish_ingest(outcome.map_err(OperationError::from));
                ui::print_fragment(self.view.ingest_region());
            }
            Completion::Search(outcome) => {
                self.view
                    .finish_search(outcome.map_err(OperationError::from));
                ui::print_fragment(self.view.search_region());
            }
            Completion::Collaborate(outcome) => {
                self.view
                    .finish_collaborate(outcome.map_err(OperationError::from));
                ui::print_fragment(self.view.collaborators_region());
            }
            Completion::Analyze {
                generation,
                outcome,
            } => {
                let applied = self
                    .view
                    .finish_analyze(generation, outcome.map_err(OperationError::from));
                if applied {
                    if let Some(detail) = self.view.detail() {
                        ui::print_fragment(detail.analysis());
                    }
                }
            }
        }
    }

    fn set_source(&mut self, arg: &str) {
        if arg.is_empty() {
            println!(
                "Current source: {} (up to {} results per ingest)",
                self.source, self.max_results
            );
        } else {
            self.source = arg.to_string();
            println!("Ingest source set to {}.", self.source);
        }
    }

    /// Reprint every region that has content
    fn show(&self) {
        if !self.view.ingest_region().is_empty() {
            ui::print_section("Ingest");
            ui::print_fragment(self.view.ingest_region());
        }
        if !self.view.search_region().is_empty() {
            ui::print_section("Search Results");
            ui::print_fragment(self.view.search_region());
        }
        if !self.view.collaborators_region().is_empty() {
            ui::print_section("Potential Collaborators");
            ui::print_fragment(self.view.collaborators_region());
        }
        if let Some(detail) = self.view.detail() {
            ui::print_section("Paper Detail");
            ui::print_fragment(detail.view());
            if !detail.analysis().is_empty() {
                ui::print_section("AI Analysis");
                ui::print_fragment(detail.analysis());
            }
        }
    }

    fn help(&self) {
        println!("Commands:");
        println!("  ingest <topic>        Ingest papers on a topic (alias: i)");
        println!("  search <query>        Search ingested papers (alias: s)");
        println!("  collab <topic>        Find potential collaborators (alias: c)");
        println!("  open <number>         Open a search result (alias: o)");
        println!("  analyze               Run AI analysis on the open paper (alias: a)");
        println!("  source [id]           Show or set the ingest source");
        println!("  show                  Reprint all regions");
        println!("  quit                  Exit the console (alias: q)");
    }

    fn prompt(&self) {
        print!("scipaper> ");
        let _ = std::io::stdout().flush();
    }
}

fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::OperationStatus;
    use mockito::Matcher;
    use std::time::Duration;

    fn console(url: &str) -> Console {
        let api = ApiClient::new(url, Duration::from_secs(5)).unwrap();
        Console::new(api, "arxiv", 10)
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("search gene editing"), ("search", "gene editing"));
        assert_eq!(split_command("search   spaced  "), ("search", "spaced"));
        assert_eq!(split_command("quit"), ("quit", ""));
    }

    #[tokio::test]
    async fn test_quit_ends_the_session() {
        let mut console = console("http://127.0.0.1:9");
        assert!(console.handle_line("help"));
        assert!(console.handle_line("bogus"));
        assert!(!console.handle_line("quit"));
        assert!(!console.handle_line("q"));
    }

    #[tokio::test]
    async fn test_blank_input_rejected_without_a_request() {
        let mut console = console("http://127.0.0.1:9");
        assert!(console.handle_line("search   "));
        assert_eq!(console.view.search_status(), OperationStatus::Failed);
        // Nothing was spawned, so no completion can ever arrive
        assert!(console.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_search_completion_flows_through_the_channel() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/search/")
            .match_query(Matcher::UrlEncoded("query".into(), "crispr".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"p-1","title":"CRISPR Advances"}]"#)
            .create_async()
            .await;

        let mut console = console(&server.url());
        console.handle_line("search crispr");
        assert_eq!(console.view.search_status(), OperationStatus::Pending);

        let completion = console.rx.recv().await.unwrap();
        console.apply(completion);
        mock.assert_async().await;

        assert_eq!(console.view.search_status(), OperationStatus::Succeeded);
        assert_eq!(
            console.view.search_region().lines(),
            &["1. CRISPR Advances".to_string()]
        );
    }

    #[tokio::test]
    async fn test_open_then_analyze_round_trip() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/search/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"p 1","title":"Spaced Id"}]"#)
            .create_async()
            .await;
        let analyze = server
            .mock("POST", "/api/v1/analyze/p%201")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"findings":["f"],"methods":[],"gaps":[]}"#)
            .create_async()
            .await;

        let mut console = console(&server.url());
        console.handle_line("search anything");
        let completion = console.rx.recv().await.unwrap();
        console.apply(completion);

        console.handle_line("open 1");
        assert_eq!(console.view.detail().unwrap().paper().id, "p 1");

        console.handle_line("analyze");
        let completion = console.rx.recv().await.unwrap();
        console.apply(completion);
        analyze.assert_async().await;

        assert_eq!(console.view.analyze_status(), OperationStatus::Succeeded);
        assert_eq!(
            console.view.detail().unwrap().analysis().lines()[0],
            "Key Findings"
        );
    }

    #[tokio::test]
    async fn test_source_command_updates_ingest_source() {
        let mut console = console("http://127.0.0.1:9");
        console.handle_line("source pubmed");
        assert_eq!(console.source, "pubmed");
        console.handle_line("source");
        assert_eq!(console.source, "pubmed");
    }
}
