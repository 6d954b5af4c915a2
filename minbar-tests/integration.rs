//! Integration tests for Minbar
//!
//! These tests exercise the full delivery router in-process: lecture
//! lookup, storage resolution, range parsing, and response assembly,
//! using tempdir-backed storage and the in-memory collaborators.

#[path = "integration/common.rs"]
mod common;

#[path = "integration/streaming_endpoints.rs"]
mod streaming_endpoints;

#[path = "integration/range_validation.rs"]
mod range_validation;

#[path = "integration/download_endpoint.rs"]
mod download_endpoint;

#[path = "integration/concurrent_streams.rs"]
mod concurrent_streams;
