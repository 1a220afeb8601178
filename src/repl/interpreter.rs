//! # Command Interpreter
//!
//! Owns the session: the resource tree, the current path, the console and
//! the request engine. Every command line goes through [`Interpreter::run`],
//! which reports errors on the console and returns the command's success
//! flag. No command failure ends the session.

use crate::error::ReplError;
use crate::repl::auth::{authenticate, AuthBinding};
use crate::repl::command::Command;
use crate::repl::engine::RequestEngine;
use crate::repl::io::Console;
use crate::repl::tree::{NodeId, ResourceTree};
use crate::wadl::load_application;
use std::collections::HashMap;
use std::path::Path;

pub struct Interpreter<C: Console> {
    tree: ResourceTree,
    current: Option<NodeId>,
    console: C,
    engine: RequestEngine,
}

impl<C: Console> Interpreter<C> {
    /// Start a session positioned at the first root of `tree`, if any
    pub fn new(tree: ResourceTree, console: C, engine: RequestEngine) -> Self {
        let current = tree.roots().first().copied();
        Self {
            tree,
            current,
            console,
            engine,
        }
    }

    pub fn tree(&self) -> &ResourceTree {
        &self.tree
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Prompt text for the next command line, e.g. `api:/items/42> `
    pub fn prompt(&self) -> String {
        match self.current {
            Some(node) => format!("{}> ", self.tree.display_path(node)),
            None => "> ".to_string(),
        }
    }

    /// Execute one command line. Blank lines succeed without effect.
    pub async fn run(&mut self, line: &str) -> bool {
        let Some(command) = Command::parse(line) else {
            return true;
        };
        tracing::debug!("Dispatching '{}': {:?}", command.name(), command);

        match self.dispatch(command).await {
            Ok(success) => success,
            Err(e) => {
                if e.is_user_input() {
                    tracing::debug!("Rejected command: {}", e);
                } else {
                    tracing::warn!("Command failed: {:#}", e);
                }
                if let Err(io) = self.console.print_error(&format!("{e}\n")) {
                    tracing::error!("Cannot report error: {:#}", io);
                }
                false
            }
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<bool, ReplError> {
        match command {
            Command::Import(args) => self.import(&args),
            Command::Cd(path) => self.cd(path.as_deref()),
            Command::Set(assignments) => self.set(&assignments),
            Command::Target(address) => self.target(address),
            Command::Server(name) => self.server(name.as_deref()),
            Command::Authenticate { scheme, args } => self.authenticate(scheme.as_deref(), &args),
            Command::Send { method, path } => self.send(&method, path.as_deref()).await,
        }
    }

    fn current_node(&self) -> Result<NodeId, ReplError> {
        self.current.ok_or(ReplError::NoServerSelected)
    }

    fn import(&mut self, args: &[String]) -> Result<bool, ReplError> {
        let file = args
            .first()
            .ok_or(ReplError::Usage("import <file> [label]"))?;
        let app = load_application(Path::new(file)).map_err(ReplError::Import)?;
        let roots = self.tree.add_application(&app, args.get(1).map(String::as_str));
        tracing::info!("Imported {} root(s) from {}", roots.len(), file);
        if self.current.is_none() {
            self.current = roots.first().copied();
        }
        Ok(true)
    }

    fn cd(&mut self, path: Option<&str>) -> Result<bool, ReplError> {
        let current = self.current_node()?;
        let next = match path {
            None => self.tree.root(current),
            Some(path) => self
                .tree
                .resolve(current, path)
                .ok_or_else(|| ReplError::NoSuchResource(path.to_string()))?,
        };
        tracing::debug!("cd {} -> {}", self.tree.display_path(current), self.tree.display_path(next));
        self.current = Some(next);
        Ok(true)
    }

    /// Bind every variable on the way from the current node up to its root
    /// that has a matching assignment; the others are cleared.
    fn set(&mut self, assignments: &HashMap<String, String>) -> Result<bool, ReplError> {
        let mut node = Some(self.current_node()?);
        while let Some(id) = node {
            if let Some(var) = self.tree.variable_name(id) {
                let value = assignments.get(var).cloned();
                self.tree.set_bound_value(id, value);
            }
            node = self.tree.node(id).parent();
        }
        Ok(true)
    }

    fn target(&mut self, address: Option<String>) -> Result<bool, ReplError> {
        let current = self.current_node()?;
        self.tree.set_target(current, address);
        Ok(true)
    }

    fn server(&mut self, name: Option<&str>) -> Result<bool, ReplError> {
        let name = name.ok_or(ReplError::Usage("server <name>"))?;
        match self.tree.find_root(name) {
            Some(root) => self.current = Some(root),
            None => tracing::debug!("No root named '{}'", name),
        }
        Ok(true)
    }

    fn authenticate(&mut self, scheme: Option<&str>, args: &[String]) -> Result<bool, ReplError> {
        let Some(scheme) = scheme else {
            return Ok(false);
        };
        let current = self.current_node()?;
        match authenticate(scheme, args, &mut self.console)? {
            AuthBinding::Clear => self.tree.set_authenticator(current, None),
            AuthBinding::Bind(auth) => self.tree.set_authenticator(current, Some(auth)),
            AuthBinding::Cancelled => return Ok(false),
        }
        Ok(true)
    }

    async fn send(&mut self, method: &str, path: Option<&str>) -> Result<bool, ReplError> {
        let current = self.current_node()?;
        let node = match path {
            None => current,
            Some(path) => self
                .tree
                .resolve(current, path)
                .ok_or(ReplError::ResourceNotFound)?,
        };
        self.engine
            .send(&mut self.tree, node, method, &mut self.console)
            .await
    }
}
