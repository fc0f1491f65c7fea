//! Tokio task spawner.

use futures::future::BoxFuture;
use purse_core::TaskSpawner;

/// Spawns onto the ambient tokio runtime.
///
/// Must be used from within a runtime context.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl TaskSpawner for TokioSpawner {
    fn spawn(&self, fut: BoxFuture<'static, ()>) {
        tokio::spawn(fut);
    }
}
