use std::{fs, path::Path};

use anyhow::{Context, Result};
use shared::domain::Paper;

pub mod config;
pub mod controller;
pub mod filter;
pub mod preferences;
pub mod sort;
pub mod transport;
pub mod view;

pub use controller::{InteractionError, Outcome, PaperInteractionController};
pub use filter::{apply_filters, FilterFlags, FilterLabels, FilteredView};
pub use preferences::PreferenceStore;
pub use sort::{sort_papers, sorted, SortColumn, SortDirection};
pub use transport::{HttpTransport, MissingTransport, Transport, TransportError};
pub use view::{Gesture, PaperControls, PresentationSurface, ViewCoordinator};

/// Parses the page payload: a JSON array of papers.
pub fn parse_paper_payload(raw: &str) -> Result<Vec<Paper>> {
    serde_json::from_str(raw).context("invalid paper payload")
}

pub fn load_paper_payload(path: &Path) -> Result<Vec<Paper>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read paper payload '{}'", path.display()))?;
    parse_paper_payload(&raw)
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
