//! # thing-archiver
//!
//! Archives Thingiverse "things" (with their files, images, remixes, makes
//! and comments) to local directories, one thing at a time or every thing of a
//! user.
//!
//! ## Design Philosophy
//!
//! thing-archiver is designed to be:
//! - **Incremental** - Re-runs skip things whose stored manifest is current and assets already on disk
//! - **Fault tolerant** - Only the core thing record is essential, everything else degrades gracefully
//! - **Crash safe** - Manifests, documents and downloads are published atomically
//! - **Polite** - Listing pages and things are throttled, transient failures are retried with backoff
//!
//! ## Quick Start
//!
//! ```no_run
//! use thing_archiver::{Archiver, Config, ThingId};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.api.token = Some(thing_archiver::config::resolve_token(None)?);
//!
//!     let archiver = Archiver::new(config)?;
//!     let report = archiver
//!         .archive_thing(&ThingId::from(11190), Path::new("./archive"), false)
//!         .await?;
//!
//!     println!("Archived to {}", report.output_dir.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Archive orchestration (single things and whole accounts)
pub mod archiver;
/// Remote API access
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// The per-thing metadata.json snapshot
pub mod manifest;
/// README / COMMENTS / LICENSE generation
pub mod render;
/// Retry logic with exponential backoff
pub mod retry;
/// Filesystem-safe naming
pub mod sanitize;
/// Core record types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use archiver::{ArchiveReport, Archiver, BatchReport, Category};
pub use client::{HttpClient, PageRequest, RemoteClient};
pub use config::Config;
pub use error::{Error, Result};
pub use manifest::Manifest;
pub use types::{Fetched, Thing, ThingId};

use std::future::Future;

/// Run `operation` until it finishes or the process receives a termination signal
///
/// On a signal the operation is dropped at its current await point and
/// [`Error::Interrupted`] is returned. Files are only ever published complete,
/// so everything already on disk stays valid.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use thing_archiver::{Archiver, Config, ThingId, run_until_interrupted};
/// use std::path::Path;
///
/// # async fn example(archiver: Archiver) -> thing_archiver::Result<()> {
/// let report = run_until_interrupted(
///     archiver.archive_thing(&ThingId::from(11190), Path::new("."), false),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_until_interrupted<F, T>(operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        result = operation => result,
        _ = wait_for_signal() => {
            tracing::warn!("Archive interrupted by user");
            Err(Error::Interrupted)
        }
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
