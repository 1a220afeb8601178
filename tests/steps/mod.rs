//! Step definitions for Cucumber tests
//!
//! Steps are organized by feature domain for better maintainability:
//! - `session` - Session setup, command execution and console assertions
//! - `http` - Mock server behavior and received-request assertions
//! - `authentication` - Challenges, credential prompts and bindings

pub mod authentication;
pub mod http;
pub mod session;
