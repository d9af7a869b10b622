//! History Module
//!
//! Call counting, argument/result logging and read-only replay of the
//! recorded history.

mod recorder;
mod replay;

pub use recorder::{
    inputs_key, outputs_key, CallRecorder, Recorded, StoreHandle, INPUTS_SUFFIX, OUTPUTS_SUFFIX,
};
pub use replay::{CallHistory, RecordedCall, ReplayReporter};
