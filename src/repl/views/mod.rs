//! # Views Module
//!
//! Turns request outcomes into styled console output.

pub mod ansi_escape_codes;
pub mod response_renderer;

// Re-export main types for convenience
pub use response_renderer::{is_xml, pretty_print_xml, Outcome, ResponseRenderer};
