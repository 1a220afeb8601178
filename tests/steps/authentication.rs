//! Step definitions for authentication
//!
//! This module contains step definitions for:
//! - Basic challenges from the mock server
//! - Scripted credential input
//! - Per-root authenticator state

use crate::common::world::WadlWorld;
use cucumber::{given, then};
use wadline::repl::services::HttpRequest;
use wadline::{Authenticator, BasicAuthenticator};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn basic_header(user: &str, password: &str) -> String {
    BasicAuthenticator::new(user, password)
        .decorate(HttpRequest::new("GET", ""))
        .header("Authorization")
        .unwrap_or_default()
        .to_string()
}

fn challenge() -> ResponseTemplate {
    ResponseTemplate::new(401).insert_header("WWW-Authenticate", "Basic realm=\"shop\"")
}

#[given(regex = r#"^the server requires Basic credentials "([^"]*)" "([^"]*)" for (\w+) "([^"]*)"$"#)]
async fn given_server_requires_basic(
    world: &mut WadlWorld,
    user: String,
    password: String,
    verb: String,
    route: String,
) {
    Mock::given(method(verb.as_str()))
        .and(path(route.as_str()))
        .and(header("Authorization", basic_header(&user, &password).as_str()))
        .respond_with(ResponseTemplate::new(200))
        .with_priority(1)
        .mount(world.server())
        .await;
    Mock::given(method(verb.as_str()))
        .and(path(route.as_str()))
        .respond_with(challenge())
        .mount(world.server())
        .await;
}

#[given(regex = r#"^the server rejects every credential for (\w+) "([^"]*)"$"#)]
async fn given_server_rejects(world: &mut WadlWorld, verb: String, route: String) {
    Mock::given(method(verb.as_str()))
        .and(path(route.as_str()))
        .respond_with(challenge())
        .mount(world.server())
        .await;
}

#[given(regex = r#"^the user will type "([^"]*)"$"#)]
async fn given_user_will_type(world: &mut WadlWorld, line: String) {
    world.console.push_input(line);
}

#[then(regex = r#"^the user was asked for a password (\d+) times?$"#)]
async fn then_password_prompts(world: &mut WadlWorld, count: usize) {
    assert_eq!(world.console.secret_prompts().len(), count);
}

#[then(regex = r#"^the root "([^"]*)" has (no|an) authenticator$"#)]
async fn then_root_authenticator(world: &mut WadlWorld, root: String, state: String) {
    let tree = world.session().tree();
    let id = tree.find_root(&root).expect("unknown root");
    assert_eq!(tree.authenticator(id).is_some(), state == "an");
}

#[then(regex = r#"^the last request carried credentials "([^"]*)" "([^"]*)"$"#)]
async fn then_last_request_credentials(world: &mut WadlWorld, user: String, password: String) {
    let received = world.received().await;
    let last = received.last().expect("no request received");
    let value = last
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(value, basic_header(&user, &password));
}
