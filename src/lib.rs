//! # wadline - Interactive REPL for WADL-described HTTP APIs
//!
//! Loads one or more WADL descriptions into a navigable resource tree and
//! lets the user walk it like a filesystem, bind URI template variables and
//! send requests whose payloads are replayed from the server or synthesized
//! from the schema.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   lines   ┌──────────────┐  sends   ┌────────────────┐
//! │   Console   │──────────▶│ Interpreter  │─────────▶│ RequestEngine  │
//! │             │◀──────────│              │          │                │
//! │ - Prompts   │  output   │ - Current    │          │ - Payloads     │
//! │ - Secrets   │           │   path       │          │ - Auth retry   │
//! │ - Output    │           │ - Tree       │          │ - Rendering    │
//! └─────────────┘           └──────────────┘          └────────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod error;
pub mod repl;
pub mod wadl;

// Re-export main types for easy access
pub use error::ReplError;
pub use repl::*;
