//! Streaming session domain.
//!
//! - [`stream::StreamEvent`]: one event of an incremental model response

pub mod stream;
