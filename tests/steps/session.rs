//! Step definitions for session setup and console output
//!
//! This module contains step definitions for:
//! - Starting a session over the shop description
//! - Running command lines
//! - Command results, prompt and console output

use crate::common::world::WadlWorld;
use cucumber::{given, then, when};
use tracing::{debug, info};
use wadline::repl::views::ansi_escape_codes::{STYLE_FAILURE, STYLE_SUCCESS};

#[given("the shop API is loaded")]
async fn given_shop_api(world: &mut WadlWorld) {
    info!("Starting shop session");
    world.start_shop().await;
}

#[when(regex = r#"^I run "([^"]*)"$"#)]
async fn when_run(world: &mut WadlWorld, line: String) {
    info!("Running command: {}", line);
    world.run(&line).await;
}

#[then("the command succeeds")]
async fn then_command_succeeds(world: &mut WadlWorld) {
    assert_eq!(world.last_result, Some(true), "errors: {}", world.console.errors());
}

#[then("the command fails")]
async fn then_command_fails(world: &mut WadlWorld) {
    assert_eq!(world.last_result, Some(false));
}

#[then(regex = r#"^the prompt is "([^"]*)"$"#)]
async fn then_prompt_is(world: &mut WadlWorld, expected: String) {
    let prompt = world.session().prompt();
    debug!("Current prompt: {:?}", prompt);
    assert_eq!(prompt, expected);
}

#[then(regex = r#"^the output contains "([^"]*)"$"#)]
async fn then_output_contains(world: &mut WadlWorld, expected: String) {
    let output = world.console.output();
    assert!(output.contains(&expected), "output was: {output:?}");
}

#[then(regex = r#"^the error output contains "([^"]*)"$"#)]
async fn then_error_output_contains(world: &mut WadlWorld, expected: String) {
    let errors = world.console.errors();
    assert!(errors.contains(&expected), "errors were: {errors:?}");
}

#[then("nothing was written to the error output")]
async fn then_no_errors(world: &mut WadlWorld) {
    assert_eq!(world.console.errors(), "");
}

#[then(regex = r#"^the status "([^"]*)" is rendered in the (success|failure) style$"#)]
async fn then_status_styled(world: &mut WadlWorld, status: String, style: String) {
    let style = if style == "success" { STYLE_SUCCESS } else { STYLE_FAILURE };
    let output = world.console.output();
    assert!(output.contains(&format!("{style}{status}")), "output was: {output:?}");
}
