//! Application state for the risk API.

use std::path::PathBuf;
use std::sync::Arc;

use risk_processor::RiskDataset;

/// Shared application state.
///
/// Everything here is built before the listener starts and never mutated,
/// so handlers read it without locking.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Grid, date axis and value/delta matrices.
    pub dataset: Arc<RiskDataset>,

    /// Stride applied when a geo query omits it.
    pub default_stride: usize,

    /// Directory holding `index.html` and static assets.
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(dataset: RiskDataset, default_stride: usize, static_dir: PathBuf) -> Self {
        Self {
            dataset: Arc::new(dataset),
            default_stride,
            static_dir,
        }
    }
}
