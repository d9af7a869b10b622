//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: purges expired keys from the in-memory store

mod cleanup;

pub use cleanup::spawn_expiry_task;
