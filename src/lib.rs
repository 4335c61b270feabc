//! # bulkops
//!
//! Bulk create/update job orchestrator for rate-limited remote APIs.
//!
//! Thousands of rows, each turned into a remote call, under operator control:
//! start, pause, resume and end, bounded concurrency, a countdown-emitting
//! delay between batches or items, auto-pause after a run of consecutive
//! failures, optional read-back verification and resumable runs.
//!
//! ## Library use
//!
//! ```rust,no_run
//! use bulkops::core::batch::{RowSource, StartJobRequest};
//! use bulkops::core::jobs::JobId;
//! use bulkops::core::remote::HttpRemote;
//! use bulkops::core::reporter::ChannelSink;
//! use bulkops::{Config, Orchestrator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let remote = HttpRemote::new(&config.remote)?;
//!     let orchestrator = Orchestrator::new(Arc::new(remote), config.orchestrator.clone());
//!
//!     let rows = RowSource::Delimited {
//!         text: "a@example.com,b@example.com".to_string(),
//!         separator: ",".to_string(),
//!         field: "email".to_string(),
//!     };
//!     let (sink, mut events) = ChannelSink::channel();
//!     orchestrator.start_job(
//!         JobId::new("cli", "default", "contacts"),
//!         StartJobRequest::new(rows, "/contacts"),
//!         Arc::new(sink),
//!     )?;
//!
//!     while let Some(event) = events.recv().await {
//!         println!("{}", serde_json::to_string(&event)?);
//!         if event.is_terminal() {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::{JobOutcome, Orchestrator, StartedJob};
pub use utils::error::{BulkError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Git commit the binary was built from
pub const GIT_HASH: &str = env!("GIT_HASH");
