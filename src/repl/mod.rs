//! # REPL
//!
//! The interactive session: a navigable tree of API resources, the command
//! interpreter over it, and the engine that turns sends into rendered HTTP
//! exchanges.
//!
//! ```text
//! ReplController ──▶ Interpreter ──▶ Command ──┬──▶ ResourceTree (cd, set, target, server)
//!                        │                      ├──▶ auth         (authenticate)
//!                        ▼                      └──▶ RequestEngine ──▶ PayloadResolver
//!                     Console                                  │──▶ Transport
//!                                                              └──▶ ResponseRenderer
//! ```

pub mod auth;
pub mod command;
pub mod controller;
pub mod engine;
pub mod interpreter;
pub mod io;
pub mod services;
pub mod tree;
pub mod views;

// Re-export core types
pub use auth::{Authenticator, BasicAuthenticator};
pub use command::Command;
pub use controller::ReplController;
pub use engine::RequestEngine;
pub use interpreter::Interpreter;
pub use io::{Console, MockConsole, TerminalConsole};
pub use services::{MockTransport, PayloadResolver, ReqwestTransport, Transport};
pub use tree::{NodeId, ResourceTree};
pub use views::{Outcome, ResponseRenderer};
