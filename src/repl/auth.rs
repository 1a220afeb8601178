//! # Authenticator Strategy
//!
//! Credential providers keyed by challenge scheme. An [`Authenticator`] only
//! decorates requests; obtaining credentials (positional arguments first,
//! interactive prompts for whatever is missing) happens in [`authenticate`].

use crate::error::ReplError;
use crate::repl::io::Console;
use crate::repl::services::HttpRequest;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::VecDeque;
use std::fmt;

/// Scheme token that clears the current authenticator
pub const NO_AUTH: &str = "none";

/// Adds scheme-specific credentials to outgoing requests
pub trait Authenticator: fmt::Debug + Send + Sync {
    /// Scheme token as it appears in `WWW-Authenticate`
    fn scheme(&self) -> &'static str;

    fn decorate(&self, request: HttpRequest) -> HttpRequest;
}

/// HTTP basic credentials
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuthenticator {
    user: String,
    password: String,
}

impl BasicAuthenticator {
    pub const SCHEME: &'static str = "Basic";

    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    fn header_value(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.user, self.password));
        format!("{} {token}", Self::SCHEME)
    }
}

impl fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

impl Authenticator for BasicAuthenticator {
    fn scheme(&self) -> &'static str {
        Self::SCHEME
    }

    fn decorate(&self, request: HttpRequest) -> HttpRequest {
        request.with_header("Authorization", self.header_value())
    }
}

/// What an `authenticate` command asks of the root's slot
#[derive(Debug)]
pub enum AuthBinding {
    /// Unbind the current authenticator
    Clear,
    /// Replace the current authenticator
    Bind(Box<dyn Authenticator>),
    /// The user ended input at a prompt; leave the slot untouched
    Cancelled,
}

/// Build the binding for `scheme`, consuming up to two positional arguments
/// (user, secret) and prompting for whatever is missing.
pub fn authenticate(
    scheme: &str,
    args: &[String],
    console: &mut dyn Console,
) -> Result<AuthBinding, ReplError> {
    if scheme.eq_ignore_ascii_case(NO_AUTH) {
        return Ok(AuthBinding::Clear);
    }
    if !scheme.eq_ignore_ascii_case(BasicAuthenticator::SCHEME) {
        return Err(ReplError::UnsupportedScheme(scheme.to_string()));
    }

    let mut args: VecDeque<String> = args.iter().cloned().collect();
    let user = match args.pop_front() {
        Some(user) => user,
        None => match console.prompt_line("Login: ").map_err(io_error)? {
            Some(user) => user,
            None => return Ok(AuthBinding::Cancelled),
        },
    };
    let password = match args.pop_front() {
        Some(password) => password,
        None => match console.prompt_secret("Password: ").map_err(io_error)? {
            Some(password) => password,
            None => return Ok(AuthBinding::Cancelled),
        },
    };

    tracing::debug!("Basic credentials obtained for user '{}'", user);
    Ok(AuthBinding::Bind(Box::new(BasicAuthenticator::new(user, password))))
}

fn io_error(e: anyhow::Error) -> ReplError {
    ReplError::Io(std::io::Error::other(format!("{e:#}")))
}

/// Scheme token of a `WWW-Authenticate` value: the text before the first
/// space. Values without a space carry no parseable scheme.
pub fn challenge_scheme(header: &str) -> Option<&str> {
    let header = header.trim_start();
    match header.find(' ') {
        Some(space) if space > 0 => Some(&header[..space]),
        _ => None,
    }
}
