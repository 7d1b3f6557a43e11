//! Storage module for downloaded payloads
//!
//! This module provides:
//! - Filename sanitization for arbitrary catalog titles
//! - A destination-rooted store that writes images and texts into
//!   per-kind subfolders

mod payload_store;
mod sanitize;

pub use payload_store::{PayloadKind, PayloadStore};
pub use sanitize::{sanitize_filename, FALLBACK_FILENAME, MAX_FILENAME_BYTES};
