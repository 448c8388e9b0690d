//! The four service operations and their lifecycle tracking.
//!
//! Every user-facing action (ingest, search, collaborator lookup, AI
//! analysis) is an [`Operation`]: it validates its inputs locally, then
//! issues exactly one request through the [`ApiClient`]. A [`Controller`]
//! owns one operation slot and steps it through [`OperationStatus`]:
//! [`Controller::trigger`] performs validation and the move to `Pending`,
//! [`Controller::resolve`] records the outcome. The API call itself happens
//! between the two, so callers decide where the await point lives (inline
//! for one-shot commands, on a spawned task for the interactive console).
//!
//! Validation failures never reach the network: the controller moves
//! straight to `Failed` and hands back the fixed message.

use async_trait::async_trait;

use crate::api::{ApiClient, ApiError, ApiResult};
use crate::models::{Analysis, Collaborator, Paper};

/// Lifecycle states of one operation slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationStatus {
    /// Nothing has been triggered yet
    #[default]
    Idle,
    /// A request is in flight
    Pending,
    /// The last run produced its output
    Succeeded,
    /// The last run failed validation or the call errored
    Failed,
}

impl OperationStatus {
    /// Stable lowercase name, used in logs and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::Idle => "idle",
            OperationStatus::Pending => "pending",
            OperationStatus::Succeeded => "succeeded",
            OperationStatus::Failed => "failed",
        }
    }
}

/// Why an operation did not produce its output
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// Input rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// The request was issued and failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A single request against the discovery service
///
/// Implementations supply three things: an input-validation rule, the
/// endpoint to hit, and the typed output. The state machine around them
/// lives in [`Controller`] and is the same for all four.
#[async_trait]
pub trait Operation: Send + Sync {
    /// Payload produced by a successful call
    type Output: Send;

    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Check inputs before any request goes out
    fn validate(&self) -> Result<(), OperationError> {
        Ok(())
    }

    /// Issue the request
    async fn call(&self, api: &ApiClient) -> ApiResult<Self::Output>;
}

/// Ingest papers on a topic from an upstream source
#[derive(Debug, Clone)]
pub struct Ingest {
    /// Topic to ingest papers for
    pub query: String,
    /// Upstream source identifier (e.g. "arxiv", "pubmed"); passed through
    /// opaquely, the service rejects identifiers it does not know
    pub source: String,
    /// Upper bound on how many papers the service should pull
    pub max_results: u32,
}

impl Ingest {
    pub fn new(query: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            source: source.into(),
            max_results: 10,
        }
    }

    /// Override the default result cap
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}

#[async_trait]
impl Operation for Ingest {
    type Output = Vec<Paper>;

    fn name(&self) -> &'static str {
        "ingest"
    }

    fn validate(&self) -> Result<(), OperationError> {
        if self.query.trim().is_empty() {
            return Err(OperationError::Validation(
                "Please enter a topic to ingest.".to_string(),
            ));
        }
        Ok(())
    }

    async fn call(&self, api: &ApiClient) -> ApiResult<Self::Output> {
        api.post(
            "/api/v1/ingest/",
            &[
                ("query", self.query.clone()),
                ("source", self.source.clone()),
                ("max_results", self.max_results.to_string()),
            ],
        )
        .await
    }
}

/// Search already-ingested papers by keyword
#[derive(Debug, Clone)]
pub struct Search {
    /// Free-text search query
    pub query: String,
}

impl Search {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

#[async_trait]
impl Operation for Search {
    type Output = Vec<Paper>;

    fn name(&self) -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<(), OperationError> {
        if self.query.trim().is_empty() {
            return Err(OperationError::Validation(
                "Please enter a search query.".to_string(),
            ));
        }
        Ok(())
    }

    async fn call(&self, api: &ApiClient) -> ApiResult<Self::Output> {
        api.get("/api/v1/search/", &[("query", self.query.clone())])
            .await
    }
}

/// Find authors who publish on a topic
#[derive(Debug, Clone)]
pub struct Collaborate {
    /// Topic to find collaborators for
    pub topic: String,
}

impl Collaborate {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl Operation for Collaborate {
    type Output = Vec<Collaborator>;

    fn name(&self) -> &'static str {
        "collaborate"
    }

    fn validate(&self) -> Result<(), OperationError> {
        if self.topic.trim().is_empty() {
            return Err(OperationError::Validation(
                "Please enter a topic to find collaborators.".to_string(),
            ));
        }
        Ok(())
    }

    async fn call(&self, api: &ApiClient) -> ApiResult<Self::Output> {
        api.get("/api/v1/collaborators/", &[("topic", self.topic.clone())])
            .await
    }
}

/// Run the AI analysis over one stored paper
///
/// No local validation: the action only exists once a detail view is open,
/// so the id always comes from a paper the service handed us.
#[derive(Debug, Clone)]
pub struct Analyze {
    /// Id of the paper to analyze
    pub paper_id: String,
}

impl Analyze {
    pub fn new(paper_id: impl Into<String>) -> Self {
        Self {
            paper_id: paper_id.into(),
        }
    }
}

#[async_trait]
impl Operation for Analyze {
    type Output = Analysis;

    fn name(&self) -> &'static str {
        "analyze"
    }

    async fn call(&self, api: &ApiClient) -> ApiResult<Self::Output> {
        let path = format!("/api/v1/analyze/{}", urlencoding::encode(&self.paper_id));
        api.post(&path, &[]).await
    }
}

/// State machine for one operation slot
///
/// The machine is the same for every operation: `Idle → Pending` on a valid
/// trigger, `Pending → Succeeded | Failed` on resolution, and straight to
/// `Failed` when validation rejects the input. No state is terminal; a new
/// trigger restarts the cycle from wherever the slot currently is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Controller {
    status: OperationStatus,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the slot
    pub fn status(&self) -> OperationStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == OperationStatus::Pending
    }

    /// Validate the operation and move to `Pending`
    ///
    /// On a validation failure the slot moves to `Failed` and the message
    /// comes back as the error; no request must be issued in that case.
    pub fn trigger<O: Operation>(&mut self, op: &O) -> Result<(), OperationError> {
        if let Err(e) = op.validate() {
            tracing::debug!(op = op.name(), error = %e, "rejected before any request");
            self.status = OperationStatus::Failed;
            return Err(e);
        }
        tracing::debug!(op = op.name(), "operation triggered");
        self.status = OperationStatus::Pending;
        Ok(())
    }

    /// Record the outcome of a finished call
    pub fn resolve<T>(&mut self, outcome: &Result<T, OperationError>) {
        self.status = match outcome {
            Ok(_) => OperationStatus::Succeeded,
            Err(_) => OperationStatus::Failed,
        };
        tracing::debug!(status = self.status.as_str(), "operation resolved");
    }

    /// Drive one operation start to finish
    ///
    /// Used by the one-shot CLI commands, where nothing else can observe the
    /// intermediate `Pending` state and holding the borrow across the await
    /// is fine.
    pub async fn run<O: Operation>(
        &mut self,
        op: &O,
        api: &ApiClient,
    ) -> Result<O::Output, OperationError> {
        self.trigger(op)?;
        let outcome = op.call(api).await.map_err(OperationError::from);
        self.resolve(&outcome);
        outcome
    }
}
