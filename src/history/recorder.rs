//! Call Recorder Module
//!
//! Counts invocations of an operation and logs its arguments and results
//! into the key-value store, namespaced by an explicit operation identity.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::Result;
use crate::store::KeyValueStore;

// == Key Suffixes ==
/// Suffix of the list holding serialized arguments.
pub const INPUTS_SUFFIX: &str = ":inputs";

/// Suffix of the list holding serialized results.
pub const OUTPUTS_SUFFIX: &str = ":outputs";

/// Key of the inputs log for `identity`.
pub fn inputs_key(identity: &str) -> String {
    format!("{}{}", identity, INPUTS_SUFFIX)
}

/// Key of the outputs log for `identity`.
pub fn outputs_key(identity: &str) -> String {
    format!("{}{}", identity, OUTPUTS_SUFFIX)
}

// == Store Handle ==
/// Capability of owning a key-value store handle.
///
/// Anything that wants its methods recorded must expose the store the
/// counters and logs are written to.
pub trait StoreHandle {
    /// The store implementation behind the handle.
    type Store: KeyValueStore;

    /// Returns the shared store handle.
    fn store_handle(&self) -> &Arc<Self::Store>;
}

// == Call Recorder ==
/// Records invocations of one operation.
///
/// Per call, in order:
/// 1. `INCR <identity>`
/// 2. `RPUSH <identity>:inputs <json args>`
/// 3. run the operation
/// 4. `RPUSH <identity>:outputs <json result>`, or `{"error": "..."}` when
///    the operation failed
///
/// The counter and the input entry are visible before the operation runs.
/// Failed calls still get an output entry so both logs stay index-aligned;
/// the original error is then returned unchanged.
#[derive(Debug)]
pub struct CallRecorder<S> {
    store: Arc<S>,
    identity: String,
}

impl<S> Clone for CallRecorder<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            identity: self.identity.clone(),
        }
    }
}

impl<S: KeyValueStore> CallRecorder<S> {
    // == Constructors ==
    /// Creates a recorder writing under `identity` into `store`.
    pub fn new(store: Arc<S>, identity: impl Into<String>) -> Self {
        Self {
            store,
            identity: identity.into(),
        }
    }

    /// Creates a recorder sharing the store of `owner`.
    pub fn for_owner<O>(owner: &O, identity: impl Into<String>) -> Self
    where
        O: StoreHandle<Store = S>,
    {
        Self::new(Arc::clone(owner.store_handle()), identity)
    }

    /// The operation identity used as counter key and log prefix.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    // == Record ==
    /// Records one invocation of `op`, called with `args`.
    ///
    /// `args` is the positional argument tuple, e.g. `&(value,)`, and is
    /// logged as a JSON array.
    pub async fn record<A, R, Fut>(&self, args: &A, op: Fut) -> Result<R>
    where
        A: Serialize + ?Sized,
        R: Serialize,
        Fut: Future<Output = Result<R>>,
    {
        let input = serde_json::to_string(args)?;
        self.record_serialized(input, || op).await
    }

    /// Runs the bookkeeping around `op`, which is only called once the
    /// counter and the input entry are in the store.
    async fn record_serialized<R, Op, Fut>(&self, input: String, op: Op) -> Result<R>
    where
        R: Serialize,
        Op: FnOnce() -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let count = self.store.incr(&self.identity).await?;
        self.store
            .rpush(&inputs_key(&self.identity), input.into_bytes())
            .await?;
        debug!("{} call #{} recorded", self.identity, count);

        let outcome = op().await;

        let output = render_outcome(&outcome);
        if outcome.is_err() {
            warn!("{} call #{} failed: {}", self.identity, count, output);
        }
        self.store
            .rpush(&outputs_key(&self.identity), output.into_bytes())
            .await?;

        outcome
    }

    // == Wrap ==
    /// Turns `op` into a recorded callable with the same argument and result
    /// types.
    pub fn wrap<F>(self, op: F) -> Recorded<S, F> {
        Recorded { recorder: self, op }
    }
}

/// JSON text logged for a finished call.
fn render_outcome<R: Serialize>(outcome: &Result<R>) -> String {
    match outcome {
        Ok(result) => serde_json::to_string(result).unwrap_or_else(|e| {
            json!({ "error": format!("unserializable result: {}", e) }).to_string()
        }),
        Err(err) => json!({ "error": err.to_string() }).to_string(),
    }
}

// == Recorded ==
/// An operation bound to a [`CallRecorder`].
pub struct Recorded<S, F> {
    recorder: CallRecorder<S>,
    op: F,
}

impl<S: KeyValueStore, F> Recorded<S, F> {
    /// Invokes the wrapped operation through the recorder.
    ///
    /// `args` is logged as a one-element argument tuple, the same shape
    /// [`CallRecorder::record`] logs for `&(args,)`.
    pub async fn call<A, R, Fut>(&self, args: A) -> Result<R>
    where
        F: Fn(A) -> Fut,
        A: Serialize,
        R: Serialize,
        Fut: Future<Output = Result<R>>,
    {
        let input = serde_json::to_string(&(&args,))?;
        self.recorder
            .record_serialized(input, || (self.op)(args))
            .await
    }

    /// The recorder used for every call.
    pub fn recorder(&self) -> &CallRecorder<S> {
        &self.recorder
    }
}
