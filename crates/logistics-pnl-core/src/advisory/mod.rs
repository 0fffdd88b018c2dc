//! Boundary to the external CFO-commentary service.
//!
//! The engine only prepares a reproducible prompt from the scenario and the
//! projected statement and hands it to a [`client::TextGenerator`]. The reply
//! is opaque text; when no reply can be had, a labeled placeholder is
//! returned and the numeric projection stays usable.

pub mod client;
pub mod prompt;

pub use client::{request_advisory, AdvisoryReport, AdvisoryStatus, TextGenerator};
pub use prompt::{build_prompt, resolve_prompt, AdvisoryContext, AdvisorySnapshot, SnapshotLine};
