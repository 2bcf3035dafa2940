//! Envelope-level unit tests.

use rstest::{fixture, rstest};

use crate::{Fragment, ShapeKind, ShapeRules, WireError, read_fields};

const ENVELOPE: [&str; 2] = ["header", "body"];

#[fixture]
fn envelope_rules() -> ShapeRules<'static> {
    ShapeRules::objects(&["body"])
}

fn read_envelope(buffer: &str) -> Result<crate::FieldSet<'_>, WireError> {
    read_fields(
        Fragment::new(buffer).strip_enclosing_braces(),
        0,
        &ShapeRules::objects(&["body"]),
        &ENVELOPE,
    )
}

#[rstest]
#[case("", &["header", "body"])]
#[case("   \n", &["header", "body"])]
#[case("header: \"morse\"", &["body"])]
#[case("body: {}", &["header"])]
#[case("header: \"morse\",", &["body"])]
fn missing_envelope_fields_are_named(#[case] buffer: &str, #[case] absent: &[&str]) {
    let error = read_envelope(buffer).expect_err("envelope is incomplete");
    assert_eq!(error, WireError::missing_fields(absent.iter().copied()));
}

#[test]
fn string_body_is_rejected_at_value_start() {
    let buffer = r#"header: "morse", body: "x""#;
    let error = read_envelope(buffer).expect_err("body must be an object");
    assert_eq!(
        error,
        WireError::invalid_shape("body", ShapeKind::Object, 23)
    );
    assert_eq!(
        error.to_string(),
        "expected a nested object for 'body' at position 23"
    );
}

#[test]
fn object_header_is_rejected() {
    let error = read_envelope("header: {}, body: {}").expect_err("header must be scalar");
    assert_eq!(
        error,
        WireError::invalid_shape("header", ShapeKind::Scalar, 8)
    );
}

#[test]
fn unclosed_quote_reports_buffer_end() {
    let buffer = r#"header: "morse"#;
    let error = read_envelope(buffer).expect_err("quote never closes");
    assert_eq!(error, WireError::missing_delimiter('"', buffer.len()));
}

#[test]
fn unclosed_quote_in_body_reports_body_end() {
    let buffer = r#"header: "morse", body: { message: "abc }"#;
    let envelope = read_envelope(buffer).expect("braces alone close the body");
    let body = envelope.object("body").expect("body fragment");
    assert_eq!(body.absolute(body.len()), 39);
    let error = read_fields(body, 0, &ShapeRules::scalars(), &["message", "to"])
        .expect_err("quote never closes inside the body");
    assert_eq!(error, WireError::missing_delimiter('"', 39));
}

#[test]
fn unclosed_quote_message_matches_wire_text() {
    let buffer = r#"header: "morse"#;
    let error = read_envelope(buffer).expect_err("quote never closes");
    assert_eq!(
        error.to_string(),
        "'\"' is missing in the data at position 14"
    );
}

#[rstest]
fn json_style_envelope_is_accepted(envelope_rules: ShapeRules<'static>) {
    let buffer = r#"{"header":"morse","body":{"message":"sos","to":"morse"}}"#;
    let envelope = read_fields(
        Fragment::new(buffer).strip_enclosing_braces(),
        0,
        &envelope_rules,
        &ENVELOPE,
    )
    .expect("envelope");
    assert_eq!(envelope.scalar("header"), Ok("morse"));

    let body = read_fields(
        envelope.object("body").expect("body"),
        0,
        &ShapeRules::scalars(),
        &["message", "to"],
    )
    .expect("body");
    assert_eq!(body.scalar("to"), Ok("morse"));
    assert_eq!(body.value_start("message"), Some(36));
}

#[test]
fn bare_subject_is_a_scalar() {
    let buffer = "header: \"mail\", body: { subject: weekly report, message: \"m\", \
                  to: { name: \"Ada\", email: \"ada@example.com\" } }";
    let envelope = read_envelope(buffer).expect("envelope");
    let body = read_fields(
        envelope.object("body").expect("body"),
        0,
        &ShapeRules::objects(&["to"]),
        &["subject", "message", "to"],
    )
    .expect("mail body");
    assert_eq!(body.scalar("subject"), Ok("weekly report"));

    let to = read_fields(
        body.object("to").expect("to"),
        0,
        &ShapeRules::scalars(),
        &["name", "email"],
    )
    .expect("recipient");
    assert_eq!(to.scalar("email"), Ok("ada@example.com"));
}

#[test]
fn field_set_iterates_in_read_order() {
    let buffer = r#"body: {}, header: "x""#;
    let envelope = read_envelope(buffer).expect("envelope");
    let keys: Vec<_> = envelope.iter().map(crate::Field::key).collect();
    assert_eq!(keys, ["body", "header"]);
    assert_eq!(envelope.len(), 2);
}
