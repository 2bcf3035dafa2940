//! Message composer used by clients.
//!
//! The format has no escaping, so composition is fallible: a value holding a
//! double quote or a key holding a separator cannot be written such that the
//! reader recovers it. Object bodies are matched by brace depth alone, so a
//! value nested in an object must also keep its braces balanced.

use crate::error::WireError;
use crate::scanner::is_whitespace;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Text(String),
    Object(ObjectBuilder),
}

/// Builds a brace-delimited object value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectBuilder {
    fields: Vec<(String, Value)>,
}

impl ObjectBuilder {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a quoted scalar field.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), Value::Text(value.into())));
        self
    }

    /// Appends a nested object field.
    #[must_use]
    pub fn object(mut self, key: impl Into<String>, value: Self) -> Self {
        self.fields.push((key.into(), Value::Object(value)));
        self
    }

    fn render(&self, out: &mut String, depth: usize) -> Result<(), WireError> {
        out.push('{');
        for (index, (key, value)) in self.fields.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            out.push('\n');
            indent(out, depth + 1);
            render_field(out, key, value, depth + 1)?;
        }
        if !self.fields.is_empty() {
            out.push('\n');
            indent(out, depth);
        }
        out.push('}');
        Ok(())
    }
}

/// Builds a complete `header`/`body` message.
///
/// ```
/// use courier_wire::compose::MessageBuilder;
///
/// let message = MessageBuilder::new("morse")
///     .field("message", "sos")
///     .field("to", "morse")
///     .build()
///     .expect("representable message");
/// assert!(message.starts_with("header: \"morse\",\nbody: {"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBuilder {
    header: String,
    body: ObjectBuilder,
}

impl MessageBuilder {
    /// Starts a message routed by `header`.
    #[must_use]
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            body: ObjectBuilder::new(),
        }
    }

    /// Appends a quoted scalar to the body.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.body = self.body.field(key, value);
        self
    }

    /// Appends a nested object to the body.
    #[must_use]
    pub fn object(mut self, key: impl Into<String>, value: ObjectBuilder) -> Self {
        self.body = self.body.object(key, value);
        self
    }

    /// Renders the message text.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::InvalidKey`] for an empty key or one containing
    /// whitespace, `:` or `"`, [`WireError::UnrepresentableValue`] for a
    /// value containing `"`, and [`WireError::UnbalancedBraces`] for a body
    /// value whose braces do not pair up.
    pub fn build(&self) -> Result<String, WireError> {
        let mut out = String::new();
        render_field(&mut out, "header", &Value::Text(self.header.clone()), 0)?;
        out.push_str(",\n");
        render_field(&mut out, "body", &Value::Object(self.body.clone()), 0)?;
        Ok(out)
    }
}

fn render_field(out: &mut String, key: &str, value: &Value, depth: usize) -> Result<(), WireError> {
    check_key(key)?;
    out.push_str(key);
    out.push_str(": ");
    match value {
        Value::Text(text) => {
            if text.contains('"') {
                return Err(WireError::UnrepresentableValue {
                    key: key.to_owned(),
                });
            }
            if depth > 0 && !braces_balance(text) {
                return Err(WireError::UnbalancedBraces {
                    key: key.to_owned(),
                });
            }
            out.push('"');
            out.push_str(text);
            out.push('"');
            Ok(())
        }
        Value::Object(object) => object.render(out, depth),
    }
}

fn braces_balance(text: &str) -> bool {
    let mut depth = 0_usize;
    for byte in text.bytes() {
        match byte {
            b'{' => depth += 1,
            b'}' => match depth.checked_sub(1) {
                Some(next) => depth = next,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

fn check_key(key: &str) -> Result<(), WireError> {
    let invalid = key.is_empty()
        || key
            .bytes()
            .any(|byte| is_whitespace(byte) || byte == b':' || byte == b'"');
    if invalid {
        return Err(WireError::InvalidKey {
            key: key.to_owned(),
        });
    }
    Ok(())
}

fn indent(out: &mut String, depth: usize) {
    out.extend(std::iter::repeat_n('\t', depth));
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{Fragment, ShapeRules, read_fields};

    #[test]
    fn renders_tab_indented_message() {
        let message = MessageBuilder::new("mail")
            .field("subject", "hi")
            .object(
                "to",
                ObjectBuilder::new().field("name", "Ada").field("email", "a@b.c"),
            )
            .build()
            .expect("message");
        assert_eq!(
            message,
            "header: \"mail\",\nbody: {\n\tsubject: \"hi\",\n\tto: {\n\t\tname: \"Ada\",\n\t\temail: \"a@b.c\"\n\t}\n}"
        );
    }

    #[test]
    fn renders_empty_body() {
        let message = MessageBuilder::new("x").build().expect("message");
        assert_eq!(message, "header: \"x\",\nbody: {}");
    }

    #[test]
    fn composed_message_reads_back() {
        let message = MessageBuilder::new("addfile")
            .field("filename", "notes.txt")
            .field("content", "line one, with a comma")
            .build()
            .expect("message");
        let envelope = read_fields(
            Fragment::new(&message),
            0,
            &ShapeRules::objects(&["body"]),
            &["header", "body"],
        )
        .expect("envelope");
        let body = read_fields(
            envelope.object("body").expect("body"),
            0,
            &ShapeRules::scalars(),
            &["filename", "content"],
        )
        .expect("body fields");
        assert_eq!(body.scalar("content"), Ok("line one, with a comma"));
    }

    #[test]
    fn rejects_quote_in_value() {
        let error = MessageBuilder::new("morse")
            .field("message", "say \"hi\"")
            .build()
            .expect_err("quote must be rejected");
        assert_eq!(
            error,
            WireError::UnrepresentableValue {
                key: "message".to_owned()
            }
        );
    }

    #[rstest]
    #[case("}")]
    #[case("{ open")]
    #[case("} {")]
    fn rejects_body_values_that_break_the_object(#[case] value: &str) {
        let error = MessageBuilder::new("addfile")
            .field("content", value)
            .build()
            .expect_err("braces must balance");
        assert_eq!(
            error,
            WireError::UnbalancedBraces {
                key: "content".to_owned()
            }
        );
    }

    #[test]
    fn balanced_braces_read_back() {
        let message = MessageBuilder::new("{x}")
            .field("content", "fn main() { }")
            .build()
            .expect("message");
        let envelope = read_fields(
            Fragment::new(&message),
            0,
            &ShapeRules::objects(&["body"]),
            &["header", "body"],
        )
        .expect("envelope");
        assert_eq!(envelope.scalar("header"), Ok("{x}"));
        let body = read_fields(
            envelope.object("body").expect("body"),
            0,
            &ShapeRules::scalars(),
            &["content"],
        )
        .expect("body fields");
        assert_eq!(body.scalar("content"), Ok("fn main() { }"));
    }

    #[rstest]
    #[case("")]
    #[case("two words")]
    #[case("a:b")]
    #[case("\"q\"")]
    fn rejects_unreadable_keys(#[case] key: &str) {
        let error = MessageBuilder::new("x")
            .field(key, "v")
            .build()
            .expect_err("key must be rejected");
        assert_eq!(
            error,
            WireError::InvalidKey {
                key: key.to_owned()
            }
        );
    }
}
