//! Last-sketch-wins analysis sessions.
//!
//! A new sketch can arrive while the previous analysis is still waiting
//! on its queries. [`AnalysisSession::run`] aborts whatever is in flight
//! before starting, so only the newest sketch ever produces a result.

use std::sync::{Mutex, PoisonError};

use futures::future::AbortHandle;
use land_suitability_analysis_models::{Recommendation, Region};

use crate::config::AnalysisConfig;
use crate::evaluator::evaluate_cancellable;
use crate::{DatasetQuery, SuitabilityError};

/// Tracks the in-flight analysis for one result panel.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    current: Mutex<Option<AbortHandle>>,
}

impl AnalysisSession {
    /// Creates a session with nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any in-flight analysis and evaluates `region`.
    ///
    /// # Errors
    ///
    /// Returns [`SuitabilityError::Cancelled`] if a later call to `run`
    /// or [`AnalysisSession::cancel`] supersedes this one, otherwise
    /// whatever [`crate::evaluate`] returns.
    pub async fn run<Q>(
        &self,
        region: &Region,
        query: &Q,
        config: &AnalysisConfig,
    ) -> Result<Recommendation, SuitabilityError>
    where
        Q: DatasetQuery + ?Sized,
    {
        let (handle, registration) = AbortHandle::new_pair();
        if let Some(previous) = self.replace(Some(handle)) {
            if !previous.is_aborted() {
                log::debug!("Superseding in-flight analysis");
            }
            previous.abort();
        }

        evaluate_cancellable(region, query, config, registration).await
    }

    /// Cancels the in-flight analysis, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.replace(None) {
            previous.abort();
        }
    }

    fn replace(&self, handle: Option<AbortHandle>) -> Option<AbortHandle> {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, handle)
    }
}
