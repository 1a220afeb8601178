//! Step definitions for HTTP request/response operations
//!
//! This module contains step definitions for:
//! - Mounting mock responses
//! - Verifying requests the server received
//! - Payload bodies and headers

use crate::common::world::WadlWorld;
use cucumber::{given, then};
use tracing::debug;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[given(regex = r#"^the server answers (\w+) "([^"]*)" with status (\d+)$"#)]
async fn given_server_answers(world: &mut WadlWorld, verb: String, route: String, status: u16) {
    Mock::given(method(verb.as_str()))
        .and(path(route.as_str()))
        .respond_with(ResponseTemplate::new(status))
        .mount(world.server())
        .await;
}

#[given(regex = r#"^the server answers (\w+) "([^"]*)" with status (\d+) and XML body "([^"]*)"$"#)]
async fn given_server_answers_xml(
    world: &mut WadlWorld,
    verb: String,
    route: String,
    status: u16,
    body: String,
) {
    Mock::given(method(verb.as_str()))
        .and(path(route.as_str()))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("Content-Type", "application/xml")
                .set_body_string(body),
        )
        .mount(world.server())
        .await;
}

#[then(regex = r#"^the server received (\d+) requests?$"#)]
async fn then_server_received(world: &mut WadlWorld, count: usize) {
    let received = world.received().await;
    debug!("Server received {:?}", received.iter().map(|r| r.url.to_string()).collect::<Vec<_>>());
    assert_eq!(received.len(), count);
}

#[then(regex = r#"^the last request was (\w+) "([^"]*)"$"#)]
async fn then_last_request(world: &mut WadlWorld, verb: String, route: String) {
    let received = world.received().await;
    let last = received.last().expect("no request received");
    assert_eq!(last.method.as_str(), verb);
    assert_eq!(last.url.path(), route);
}

#[then(regex = r#"^the (\w+) request body contains "([^"]*)"$"#)]
async fn then_request_body_contains(world: &mut WadlWorld, verb: String, expected: String) {
    let received = world.received().await;
    let request = received
        .iter()
        .rev()
        .find(|r| r.method.as_str() == verb)
        .expect("no matching request received");
    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains(&expected), "body was: {body:?}");
}
