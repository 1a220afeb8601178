//! # wadline Main Entry Point
//!
//! Loads configuration and descriptions, wires the production services and
//! runs the REPL on the terminal.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;
use wadline::cmd_args::CommandLineArgs;
use wadline::config::{ReplConfig, DEFAULT_LOG_LEVEL};
use wadline::repl::services::{ExternalEditor, PayloadEditor};
use wadline::wadl::{load_application, SkeletonGenerator};
use wadline::{
    Interpreter, PayloadResolver, ReplController, ReqwestTransport, RequestEngine, ResourceTree,
    ResponseRenderer, TerminalConsole,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CommandLineArgs::parse();
    let config = ReplConfig::load(&args)?;
    init_tracing(&config.log_level);
    tracing::debug!("Configuration: {:?}", config);

    let mut tree = ResourceTree::new();
    for file in &config.wadl {
        let app = load_application(file)
            .with_context(|| format!("failed to load {}", file.display()))?;
        tree.add_application(&app, None);
    }
    if tree.is_empty() {
        tracing::info!("No description loaded; use 'import <file>' to add one");
    }

    let editor = config
        .editor
        .as_deref()
        .and_then(ExternalEditor::from_command)
        .map(|editor| Box::new(editor) as Box<dyn PayloadEditor>);
    let resolver = PayloadResolver::new(config.payload_file.clone(), Box::new(SkeletonGenerator))
        .with_editor(editor);
    let renderer = ResponseRenderer::new(std::io::stdout().is_terminal());
    let engine = RequestEngine::new(Arc::new(ReqwestTransport::new()?), resolver, renderer);

    let interpreter = Interpreter::new(tree, TerminalConsole::new(), engine);
    let mut repl = ReplController::new(interpreter);
    repl.run().await?;
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
}
