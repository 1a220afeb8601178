use crate::common::fixtures::shop_session;
use cucumber::World;
use std::sync::Arc;
use wadline::{Interpreter, MockConsole, ReqwestTransport};
use wiremock::MockServer;

/// Represents one REPL session under test
#[derive(World)]
#[world(init = Self::new)]
pub struct WadlWorld {
    /// Scripted console shared with the session
    pub console: MockConsole,

    /// Mock HTTP server standing in for the described API
    pub mock_server: Option<MockServer>,

    /// Session under test, created once the server is up
    pub session: Option<Interpreter<MockConsole>>,

    /// Success flag of the last command
    pub last_result: Option<bool>,

    /// Holds the description, schema and scratch payload file
    workdir: tempfile::TempDir,
}

impl std::fmt::Debug for WadlWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WadlWorld")
            .field("server", &self.mock_server.as_ref().map(|s| s.uri()))
            .field("prompt", &self.session.as_ref().map(|s| s.prompt()))
            .field("last_result", &self.last_result)
            .finish()
    }
}

impl WadlWorld {
    pub fn new() -> Self {
        Self {
            console: MockConsole::default(),
            mock_server: None,
            session: None,
            last_result: None,
            workdir: tempfile::tempdir().unwrap(),
        }
    }

    /// Start the mock server and a session over the shop description
    pub async fn start_shop(&mut self) {
        let server = MockServer::start().await;
        let transport = Arc::new(ReqwestTransport::new().unwrap());
        let session = shop_session(
            self.workdir.path(),
            &server.uri(),
            transport,
            self.console.clone(),
            true,
        );
        tracing::debug!("Shop session started against {}", server.uri());
        self.mock_server = Some(server);
        self.session = Some(session);
    }

    pub fn server(&self) -> &MockServer {
        self.mock_server.as_ref().expect("mock server not started")
    }

    pub fn session(&self) -> &Interpreter<MockConsole> {
        self.session.as_ref().expect("session not started")
    }

    pub async fn run(&mut self, line: &str) {
        let session = self.session.as_mut().expect("session not started");
        self.last_result = Some(session.run(line).await);
    }

    pub async fn received(&self) -> Vec<wiremock::Request> {
        self.server().received_requests().await.unwrap_or_default()
    }
}
