//! Replay Module
//!
//! Rebuilds the call history written by [`super::CallRecorder`] without
//! re-running anything.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::history::recorder::{inputs_key, outputs_key};
use crate::store::KeyValueStore;

// == Call History ==
/// One recorded call: serialized arguments and serialized result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedCall {
    /// JSON argument tuple
    pub input: String,
    /// JSON result, or the error marker of a failed call
    pub output: String,
}

/// Recorded history of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallHistory {
    /// Operation identity
    pub identity: String,
    /// Value of the invocation counter
    pub count: u64,
    /// Calls in invocation order
    pub calls: Vec<RecordedCall>,
}

impl CallHistory {
    /// Renders the history as a JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for CallHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.identity, self.count)?;
        for call in &self.calls {
            write!(f, "\n{}(*{}) -> {}", self.identity, call.input, call.output)?;
        }
        Ok(())
    }
}

// == Replay Reporter ==
/// Reads recorder counters and logs back out of the store.
#[derive(Debug)]
pub struct ReplayReporter<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> ReplayReporter<S> {
    /// Creates a reporter reading from `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Reads the history of `identity`.
    ///
    /// The count comes from the invocation counter, falling back to 0 when it
    /// is missing or not a number. Inputs and outputs are paired by index and
    /// truncated to the shorter log.
    pub async fn replay(&self, identity: &str) -> Result<CallHistory> {
        let count = match self.store.get(identity).await? {
            Some(raw) => parse_count(&raw).unwrap_or_else(|| {
                warn!("Counter for {} is not a number, reporting 0", identity);
                0
            }),
            None => 0,
        };

        let inputs = self.store.lrange(&inputs_key(identity), 0, -1).await?;
        let outputs = self.store.lrange(&outputs_key(identity), 0, -1).await?;
        if inputs.len() != outputs.len() {
            warn!(
                "{} has {} inputs but {} outputs",
                identity,
                inputs.len(),
                outputs.len()
            );
        }

        let calls = inputs
            .into_iter()
            .zip(outputs)
            .map(|(input, output)| RecordedCall {
                input: String::from_utf8_lossy(&input).into_owned(),
                output: String::from_utf8_lossy(&output).into_owned(),
            })
            .collect();

        info!("Replayed {}: {} calls", identity, count);
        Ok(CallHistory {
            identity: identity.to_string(),
            count,
            calls,
        })
    }
}

fn parse_count(raw: &[u8]) -> Option<u64> {
    std::str::from_utf8(raw).ok()?.trim().parse().ok()
}
