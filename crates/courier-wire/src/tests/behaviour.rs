//! Behaviour-driven tests for reading whole requests.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::{Fragment, ShapeRules, WireError, read_fields};

#[derive(Default)]
struct TestWorld {
    request: String,
    outcome: Option<Result<Vec<(String, String)>, WireError>>,
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

fn sample(name: &str) -> &'static str {
    match name {
        "morse request" => r#"header: "morse", body: { message: "sos", to: "morse" }"#,
        "wrapped morse request" => r#"{"header":"morse","body":{"message":"sos","to":"morse"}}"#,
        "header only" => r#"header: "morse""#,
        "string body" => r#"header: "morse", body: "x""#,
        "mail request" => {
            r#"header: "mail", body: { subject: weekly, message: "hi", to: { name: "Ada", email: "ada@example.com" } }"#
        }
        "mail missing comma" => {
            r#"header: "mail", body: { subject: "s", message: "m", to: { name: "Ada" email: "a" } }"#
        }
        "morse unclosed quote" => r#"header: "morse", body: { message: "abc }"#,
        other => panic!("unknown sample request: {other}"),
    }
}

fn owned(fields: &crate::FieldSet<'_>) -> Vec<(String, String)> {
    fields
        .iter()
        .filter(|field| !field.is_object())
        .map(|field| (field.key().to_owned(), field.value().to_owned()))
        .collect()
}

fn read_envelope(request: &str) -> Result<crate::FieldSet<'_>, WireError> {
    read_fields(
        Fragment::new(request).strip_enclosing_braces(),
        0,
        &ShapeRules::objects(&["body"]),
        &["header", "body"],
    )
}

fn read_recipient(request: &str) -> Result<Vec<(String, String)>, WireError> {
    let envelope = read_envelope(request)?;
    let body = read_fields(
        envelope.object("body")?,
        0,
        &ShapeRules::objects(&["to"]),
        &["subject", "message", "to"],
    )?;
    let to = read_fields(
        body.object("to")?,
        0,
        &ShapeRules::scalars(),
        &["name", "email"],
    )?;
    Ok(owned(&to))
}

fn read_morse_body(request: &str) -> Result<Vec<(String, String)>, WireError> {
    let envelope = read_envelope(request)?;
    let body = read_fields(
        envelope.object("body")?,
        0,
        &ShapeRules::scalars(),
        &["message", "to"],
    )?;
    Ok(owned(&body))
}

#[given("the request {name}")]
fn given_request(world: &RefCell<TestWorld>, name: String) {
    world.borrow_mut().request = sample(strip_quotes(&name)).to_owned();
}

#[when("the envelope is read")]
fn when_envelope_read(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let outcome = read_envelope(&w.request).map(|fields| owned(&fields));
    w.outcome = Some(outcome);
}

#[when("the mail recipient is read")]
fn when_recipient_read(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let outcome = read_recipient(&w.request);
    w.outcome = Some(outcome);
}

#[when("the morse body is read")]
fn when_morse_body_read(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let outcome = read_morse_body(&w.request);
    w.outcome = Some(outcome);
}

#[then("field {key} is {value}")]
fn then_field_is(world: &RefCell<TestWorld>, key: String, value: String) {
    let w = world.borrow();
    let fields = w
        .outcome
        .as_ref()
        .expect("request should have been read")
        .as_ref()
        .expect("read should succeed");
    let found = fields
        .iter()
        .find(|(name, _)| name == strip_quotes(&key))
        .map(|(_, text)| text.as_str());
    assert_eq!(found, Some(strip_quotes(&value)));
}

#[then("reading fails with {message}")]
fn then_reading_fails(world: &RefCell<TestWorld>, message: String) {
    let w = world.borrow();
    let error = w
        .outcome
        .as_ref()
        .expect("request should have been read")
        .as_ref()
        .expect_err("read should fail");
    assert_eq!(error.to_string(), strip_quotes(&message));
}

#[scenario(
    path = "tests/features/courier_wire.feature",
    name = "A well-formed envelope exposes its header"
)]
fn well_formed_envelope(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/courier_wire.feature",
    name = "A brace-wrapped envelope is accepted"
)]
fn brace_wrapped_envelope(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/courier_wire.feature",
    name = "A missing body is reported by name"
)]
fn missing_body(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/courier_wire.feature",
    name = "A string body is rejected where its value starts"
)]
fn string_body(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/courier_wire.feature",
    name = "A nested recipient is read from a mail request"
)]
fn nested_recipient(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/courier_wire.feature",
    name = "Nested errors report positions in the original request"
)]
fn nested_error_positions(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/courier_wire.feature",
    name = "An unclosed quote inside the body is reported where the body ends"
)]
fn unclosed_quote_in_body(world: RefCell<TestWorld>) {
    let _ = world;
}
