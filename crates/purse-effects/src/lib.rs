//! Layer 2: Effect Handlers - Production Only
//!
//! Stateless tokio-backed implementations of the effect traits defined in
//! `purse-core`. Test doubles belong in `purse-testkit`.

#![forbid(unsafe_code)]

pub mod task;
pub mod time;

pub use task::TokioSpawner;
pub use time::TokioTimeHandler;
