//! # SciPaper CLI
//!
//! A terminal client for the SciPaper research discovery service: ingest
//! papers from upstream sources, search the index, find potential
//! collaborators, and run AI analysis over a stored paper.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`api`]: HTTP client for the service's JSON API
//! - [`models`]: Core data structures (Paper, Collaborator, Analysis)
//! - [`ops`]: The four operations and their lifecycle state machine
//! - [`render`]: Pure renderers turning response models into fragments
//! - [`view`]: Per-session view state, including the analyze discard rule
//! - [`console`]: Interactive console event loop
//! - [`config`]: Configuration management
//! - [`ui`]: Colored terminal output

pub mod api;
pub mod config;
pub mod console;
pub mod models;
pub mod ops;
pub mod render;
pub mod ui;
pub mod view;

// Re-export commonly used types
pub use api::{ApiClient, ApiError};
pub use models::Paper;
pub use ops::{Controller, Operation, OperationError, OperationStatus};
pub use view::ViewModel;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
