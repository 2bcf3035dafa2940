//! Record reader: extracts a caller-specified set of fields from a fragment.

use crate::error::{ShapeKind, WireError};
use crate::field::{Field, read_field};
use crate::fragment::Fragment;
use crate::scanner::skip_whitespace;

/// Per-field shape check applied while a record is read.
///
/// Implemented for closures so ad hoc rules can be passed inline, and by
/// [`ShapeRules`] for the common "these keys are objects, the rest scalars"
/// case.
pub trait ShapeValidator {
    /// Accepts the field or returns the error that aborts the read.
    ///
    /// # Errors
    ///
    /// Returns whatever error the rule wants surfaced to the caller.
    fn validate(&self, field: &Field<'_>) -> Result<(), WireError>;
}

impl<F> ShapeValidator for F
where
    F: Fn(&Field<'_>) -> Result<(), WireError>,
{
    fn validate(&self, field: &Field<'_>) -> Result<(), WireError> {
        self(field)
    }
}

/// Requires the listed keys to be objects and every other key to be a scalar.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeRules<'r> {
    objects: &'r [&'r str],
}

impl<'r> ShapeRules<'r> {
    /// Every field must be a scalar.
    #[must_use]
    pub const fn scalars() -> Self {
        Self { objects: &[] }
    }

    /// The named fields must be objects; all others must be scalars.
    #[must_use]
    pub const fn objects(objects: &'r [&'r str]) -> Self {
        Self { objects }
    }

    /// The shape required for `key` under these rules.
    #[must_use]
    pub fn expected_for(&self, key: &str) -> ShapeKind {
        if self.objects.contains(&key) {
            ShapeKind::Object
        } else {
            ShapeKind::Scalar
        }
    }
}

impl ShapeValidator for ShapeRules<'_> {
    fn validate(&self, field: &Field<'_>) -> Result<(), WireError> {
        let expected = self.expected_for(field.key());
        if ShapeKind::of(field.shape()) == expected {
            Ok(())
        } else {
            Err(WireError::invalid_shape(
                field.key(),
                expected,
                field.value_start(),
            ))
        }
    }
}

/// Fields decoded by one [`read_fields`] call, in the order they were read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet<'a> {
    fields: Vec<Field<'a>>,
}

impl<'a> FieldSet<'a> {
    /// Looks up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field<'a>> {
        self.fields.iter().find(|field| field.key() == name)
    }

    /// Returns the scalar text of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MissingFields`] when the field was not read and
    /// [`WireError::InvalidShape`] when it holds an object.
    pub fn scalar(&self, name: &str) -> Result<&'a str, WireError> {
        let field = self.require(name)?;
        if field.is_object() {
            return Err(WireError::invalid_shape(
                name,
                ShapeKind::Scalar,
                field.value_start(),
            ));
        }
        Ok(field.value())
    }

    /// Returns the nested object body of `name` as a fragment.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::MissingFields`] when the field was not read and
    /// [`WireError::InvalidShape`] when it holds a scalar.
    pub fn object(&self, name: &str) -> Result<Fragment<'a>, WireError> {
        let field = self.require(name)?;
        if !field.is_object() {
            return Err(WireError::invalid_shape(
                name,
                ShapeKind::Object,
                field.value_start(),
            ));
        }
        Ok(field.value_fragment())
    }

    /// Absolute start offset of the value of `name`, if it was read.
    #[must_use]
    pub fn value_start(&self, name: &str) -> Option<usize> {
        self.get(name).map(Field::value_start)
    }

    /// Iterates over the fields in read order.
    pub fn iter(&self) -> impl Iterator<Item = &Field<'a>> {
        self.fields.iter()
    }

    /// Number of fields read.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when no field was read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn require(&self, name: &str) -> Result<&Field<'a>, WireError> {
        self.get(name)
            .ok_or_else(|| WireError::missing_fields([name]))
    }

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<'s, 'a> IntoIterator for &'s FieldSet<'a> {
    type Item = &'s Field<'a>;
    type IntoIter = std::slice::Iter<'s, Field<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Reads exactly the fields named in `expected`, starting at local offset
/// `pos` of `fragment`.
///
/// Fields may appear in any order but each must be one of `expected` and may
/// appear only once. Fields are separated by commas and nothing but
/// whitespace may follow the last one. The read is atomic: on error no fields
/// are returned.
///
/// # Errors
///
/// Propagates [`read_field`] errors and validator errors verbatim, and returns
/// [`WireError::MissingFields`], [`WireError::UnexpectedField`],
/// [`WireError::DuplicateField`], [`WireError::MissingDelimiter`] (for `,`) or
/// [`WireError::TrailingData`] when the record structure is wrong.
pub fn read_fields<'a, V>(
    fragment: Fragment<'a>,
    pos: usize,
    validator: &V,
    expected: &[&str],
) -> Result<FieldSet<'a>, WireError>
where
    V: ShapeValidator + ?Sized,
{
    let bytes = fragment.bytes();
    let mut set = FieldSet {
        fields: Vec::with_capacity(expected.len()),
    };
    let mut cursor = pos;

    for slot in 0..expected.len() {
        cursor = skip_whitespace(bytes, cursor);
        if cursor >= bytes.len() {
            return Err(WireError::missing_fields(
                expected.iter().filter(|name| !set.contains(name)).copied(),
            ));
        }

        let read = read_field(fragment, cursor)?;
        let field = read.field;
        check_name(&set, &field, expected)?;
        validator.validate(&field)?;
        set.fields.push(field);

        cursor = skip_whitespace(bytes, read.end);
        let is_last = slot + 1 == expected.len();
        if !is_last && cursor < bytes.len() {
            if fragment.byte_at(cursor) != Some(b',') {
                return Err(WireError::missing_delimiter(
                    ',',
                    fragment.absolute(cursor),
                ));
            }
            cursor += 1;
        }
    }

    cursor = skip_whitespace(bytes, cursor);
    if cursor < bytes.len() {
        return Err(WireError::TrailingData {
            after: set.fields.last().map(|field| field.key().to_owned()),
            position: fragment.absolute(cursor),
        });
    }

    Ok(set)
}

fn check_name(set: &FieldSet<'_>, field: &Field<'_>, expected: &[&str]) -> Result<(), WireError> {
    if !expected.contains(&field.key()) {
        return Err(WireError::UnexpectedField {
            key: field.key().to_owned(),
            position: field.key_start(),
        });
    }
    if set.contains(field.key()) {
        return Err(WireError::DuplicateField {
            key: field.key().to_owned(),
            position: field.key_start(),
        });
    }
    Ok(())
}
