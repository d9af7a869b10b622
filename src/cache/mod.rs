//! Cache Module
//!
//! Typed store/retrieve on top of a [`crate::store::KeyValueStore`].

mod client;
mod codec;


// Re-export public types
pub use client::{Cache, STORE_IDENTITY};
pub use codec::{Decode, Value};
