//! # Core Application Module
//!
//! - [`AppCore`]: the state holder passed to every workflow
//! - [`StreamId`]: independent generation streams
//! - [`ListStream`]: paginated streams and their gate namespaces

mod app;
mod stream;

pub use app::AppCore;
pub use stream::{ListStream, StreamId};
