//! Multipart boundary generation.
//!
//! A composer asks its [`BoundaryGenerator`] for a boundary at most once, the
//! first time a multipart header block is finalized. The default generator is
//! the process-wide [`SequenceBoundary`], which appends a sequence number to a
//! random token and only pays for a fresh token once every 1000 boundaries.
//!
//! Generators must hand out distinct boundaries to responses that are in
//! flight at the same time. Boundaries are not secrets and are not meant to be
//! unguessable.

use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;
use tracing::debug;
use uuid::Uuid;

/// A source of multipart boundaries.
pub trait BoundaryGenerator: Send + Sync {
    /// Returns a boundary not currently used by another outstanding response.
    fn next_boundary(&self) -> String;
}

/// Sequence numbers cycle through `0..SEQUENCE_LIMIT`.
const SEQUENCE_LIMIT: u16 = 1000;

/// Boundary generator combining a random token with a wrapping sequence number.
///
/// The token is regenerated every time the sequence wraps, so a boundary is
/// never repeated within one token's lifetime.
#[derive(Debug)]
pub struct SequenceBoundary {
    state: Mutex<SequenceState>,
}

#[derive(Debug)]
struct SequenceState {
    index: u16,
    token: Option<String>,
}

static GLOBAL_BOUNDARY: Lazy<SequenceBoundary> = Lazy::new(SequenceBoundary::new);

impl SequenceBoundary {
    pub fn new() -> Self {
        Self { state: Mutex::new(SequenceState { index: 0, token: None }) }
    }

    /// Returns the process-wide generator used by composers that were not
    /// given one explicitly.
    pub fn global() -> &'static SequenceBoundary {
        &GLOBAL_BOUNDARY
    }
}

impl Default for SequenceBoundary {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundaryGenerator for SequenceBoundary {
    fn next_boundary(&self) -> String {
        // the state stays consistent even if a holder panicked
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        state.index += 1;
        if state.index >= SEQUENCE_LIMIT {
            state.index = 0;
            state.token = None;
        }

        let index = state.index;
        let token = state.token.get_or_insert_with(|| {
            let token = Uuid::new_v4().simple().to_string();
            debug!(token = %token, "generated new multipart boundary token");
            token
        });

        format!("{token}{index}")
    }
}

/// A generator that always returns the same boundary.
///
/// Useful for reproducible output. Only safe when a single multipart response
/// using it is outstanding at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedBoundary(String);

impl FixedBoundary {
    pub fn new(boundary: impl Into<String>) -> Self {
        Self(boundary.into())
    }
}

impl BoundaryGenerator for FixedBoundary {
    fn next_boundary(&self) -> String {
        self.0.clone()
    }
}
