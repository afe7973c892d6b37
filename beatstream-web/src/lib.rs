//! Beatstream Web - JSON API Server

#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Lists the audio library page by page and streams individual files with
//! single byte-range support.

pub mod handlers;
pub mod server;

// Re-export main types
pub use server::{AppState, router, run_server};
