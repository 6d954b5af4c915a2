//! Minbar Web - HTTP audio delivery server
//!
//! Serves lecture audio over HTTP with byte-range support (seeking),
//! partial-content semantics, attachment downloads, and JSON error
//! envelopes. Lecture metadata, file storage, and usage counters are
//! consumed through the collaborator traits in `minbar-core`.

pub mod error;
pub mod handlers;
pub mod responder;
pub mod server;

// Re-export main types
pub use error::ApiError;
pub use server::{AppState, build_router, run_server};
