//! # Request/Response Engine
//!
//! Drives one send from the interpreter to a rendered outcome:
//!
//! ```text
//! Prepare ──▶ Execute ──▶ Classify ──┬──▶ Render
//!                ▲                    │
//!                └── Authenticate ◀───┘  (401 with a parseable challenge, once)
//! ```
//!
//! The prepared request is built once. A retry after authentication
//! re-executes that same request with the newly bound credentials; the
//! payload is not resolved again.

use crate::error::ReplError;
use crate::repl::auth::{authenticate, challenge_scheme, AuthBinding};
use crate::repl::io::Console;
use crate::repl::services::{
    choose_representation, HttpRequest, HttpResponse, Payload, PayloadResolver, PayloadTarget,
    Transport,
};
use crate::repl::tree::{NodeId, ResourceTree};
use crate::repl::views::{Outcome, ResponseRenderer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

const STATUS_UNAUTHORIZED: u16 = 401;
const WWW_AUTHENTICATE: &str = "www-authenticate";

pub struct RequestEngine {
    transport: Arc<dyn Transport>,
    resolver: PayloadResolver,
    renderer: ResponseRenderer,
    rng: StdRng,
}

impl RequestEngine {
    pub fn new(
        transport: Arc<dyn Transport>,
        resolver: PayloadResolver,
        renderer: ResponseRenderer,
    ) -> Self {
        Self {
            transport,
            resolver,
            renderer,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the representation picker's random source
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Send `method` to `node` and render the terminal outcome.
    ///
    /// Returns `Ok(false)` without issuing a request when the payload edit
    /// was aborted.
    pub async fn send(
        &mut self,
        tree: &mut ResourceTree,
        node: NodeId,
        method: &str,
        console: &mut dyn Console,
    ) -> Result<bool, ReplError> {
        let Some(request) = self.prepare(tree, node, method).await? else {
            return Ok(false);
        };

        let mut retried = false;
        loop {
            let decorated = match tree.authenticator(node) {
                Some(auth) => auth.decorate(request.clone()),
                None => request.clone(),
            };
            let response = self
                .transport
                .execute(&decorated)
                .await
                .map_err(ReplError::Transport)?;
            tracing::debug!("{} {} -> {}", decorated.method, decorated.url, response.status);

            if !retried && response.status == STATUS_UNAUTHORIZED {
                retried = true;
                if Self::answer_challenge(tree, node, &response, console)? {
                    tracing::info!("Retrying {} {} with new credentials", request.method, request.url);
                    continue;
                }
            }

            let outcome = Outcome::from(response);
            return self.renderer.render(&outcome, console).map_err(io_error);
        }
    }

    /// Build the request for `method` on `node`; `None` when the payload
    /// edit was aborted
    async fn prepare(
        &mut self,
        tree: &ResourceTree,
        node: NodeId,
        method: &str,
    ) -> Result<Option<HttpRequest>, ReplError> {
        let resource = tree.resource(node).ok_or(ReplError::ResourceNotFound)?;
        let definition = resource
            .find_method(method)
            .ok_or_else(|| ReplError::UnsupportedMethod(method.to_string()))?;

        let uri = tree.uri(node);
        let mut request = HttpRequest::new(definition.name.to_ascii_uppercase(), &uri);

        let Some(body) = &definition.request else {
            return Ok(Some(request));
        };
        let Some(choice) = choose_representation(&body.representations, &mut self.rng) else {
            return Ok(Some(request));
        };
        tracing::debug!("Chose representation {:?}", choice.content_type);

        let live_read = (tree.variable_name(node).is_some() && resource.find_method("GET").is_some())
            .then(|| {
                let read = HttpRequest::new("GET", &uri);
                match tree.authenticator(node) {
                    Some(auth) => auth.decorate(read),
                    None => read,
                }
            });
        let schema = if choice.element.is_some() { tree.schema(node) } else { None };

        let target = PayloadTarget {
            choice: &choice,
            live_read,
            schema,
        };
        match self
            .resolver
            .resolve(target, self.transport.as_ref())
            .await
            .map_err(ReplError::Payload)?
        {
            Payload::Empty => {}
            Payload::Body(bytes) => {
                if let Some(content_type) = &choice.content_type {
                    request = request.with_header("Content-Type", content_type.as_str());
                }
                request = request.with_body(bytes);
            }
            Payload::Aborted => return Ok(None),
        }
        Ok(Some(request))
    }

    /// Obtain credentials for a 401. `true` when a new authenticator was
    /// bound and the request should be re-executed.
    fn answer_challenge(
        tree: &mut ResourceTree,
        node: NodeId,
        response: &HttpResponse,
        console: &mut dyn Console,
    ) -> Result<bool, ReplError> {
        let Some(scheme) = response.header(WWW_AUTHENTICATE).and_then(challenge_scheme) else {
            tracing::debug!("401 without a parseable challenge");
            return Ok(false);
        };
        tracing::info!("Server requested '{}' authentication", scheme);

        match authenticate(scheme, &[], console) {
            Ok(AuthBinding::Bind(auth)) => {
                tree.set_authenticator(node, Some(auth));
                Ok(true)
            }
            Ok(AuthBinding::Clear) | Ok(AuthBinding::Cancelled) => Ok(false),
            Err(ReplError::UnsupportedScheme(scheme)) => {
                console
                    .print_error(&format!("{}\n", ReplError::UnsupportedScheme(scheme)))
                    .map_err(io_error)?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

fn io_error(e: anyhow::Error) -> ReplError {
    ReplError::Io(std::io::Error::other(format!("{e:#}")))
}
