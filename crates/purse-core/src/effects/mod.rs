//! Effect interfaces (pure signatures, no implementations)
//!
//! Production handlers live in `purse-effects`. Keeping these as traits lets
//! the primitives run under any executor and under a paused test clock.

pub mod task;
pub mod time;

pub use task::{CancellationToken, NeverCancel, TaskSpawner};
pub use time::TimeEffects;
