//! Runtime description of answer shapes.
//!
//! A [`ValueShape`] describes the set of values a single answer may take and a
//! [`RecordShape`] describes a whole answer record. Both render in a compact
//! TypeScript-like notation for diagnostics.

use std::fmt;

use serde_json::Value;

use crate::Answers;

/// Name of a JSON value's type, for error messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The set of values an answer may take.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueShape {
    /// Uninhabited: no value fits (e.g. a select question without choices).
    Never,

    /// Any value.
    Unknown,

    Null,
    String,
    Number,
    Boolean,

    /// Exactly this value.
    Literal(Value),

    /// An ordered list whose elements have the inner shape.
    List(Box<ValueShape>),

    /// Any of the member shapes. Built through [`ValueShape::union`].
    Union(Vec<ValueShape>),
}

impl ValueShape {
    /// Shape holding exactly `value`.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// List of elements of the given shape.
    pub fn list(element: ValueShape) -> Self {
        Self::List(Box::new(element))
    }

    /// Normalized union of the given shapes.
    ///
    /// Nested unions are flattened, `Never` members vanish, duplicates are
    /// removed, literals are absorbed by their base shape when that is present,
    /// and `Unknown` absorbs everything. An empty union is `Never`.
    pub fn union(shapes: impl IntoIterator<Item = ValueShape>) -> Self {
        let mut members: Vec<ValueShape> = Vec::new();
        for shape in shapes {
            match shape {
                Self::Never => {}
                Self::Unknown => return Self::Unknown,
                Self::Union(inner) => {
                    for member in inner {
                        if !members.contains(&member) {
                            members.push(member);
                        }
                    }
                }
                other => {
                    if !members.contains(&other) {
                        members.push(other);
                    }
                }
            }
        }

        let bases: Vec<ValueShape> = members
            .iter()
            .filter(|m| !matches!(m, Self::Literal(_)))
            .cloned()
            .collect();
        members.retain(|m| match m {
            Self::Literal(v) => !bases.contains(&Self::base_of(v)),
            _ => true,
        });

        match members.len() {
            0 => Self::Never,
            1 => members.remove(0),
            _ => Self::Union(members),
        }
    }

    /// The widened shape of a concrete value (`"red"` widens to `string`).
    pub fn base_of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(items) => Self::list(Self::union(items.iter().map(Self::base_of))),
            Value::Object(_) => Self::Unknown,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Self::Never)
    }

    /// Check whether `value` is a member of this shape.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Never => false,
            Self::Unknown => true,
            Self::Null => value.is_null(),
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Literal(expected) => expected == value,
            Self::List(element) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|item| element.accepts(item))),
            Self::Union(members) => members.iter().any(|m| m.accepts(value)),
        }
    }

    /// Check whether every value of this shape is also a value of `other`.
    ///
    /// `"red" | "blue"` is within `string`, `(1 | 2)[]` is within `number[]`,
    /// and `never` is within everything.
    pub fn is_within(&self, other: &ValueShape) -> bool {
        match (self, other) {
            (Self::Never, _) | (_, Self::Unknown) => true,
            (Self::Union(members), _) => members.iter().all(|m| m.is_within(other)),
            (Self::Literal(value), _) => other.accepts(value),
            (_, Self::Union(members)) => members.iter().any(|m| self.is_within(m)),
            (Self::List(inner), Self::List(outer)) => inner.is_within(outer),
            _ => self == other,
        }
    }

    /// Literal members of this shape, if it is built only from literals.
    ///
    /// Useful to enumerate the possible answers of a choice question.
    pub fn literals(&self) -> Option<Vec<&Value>> {
        match self {
            Self::Literal(v) => Some(vec![v]),
            Self::Union(members) => members
                .iter()
                .map(|m| match m {
                    Self::Literal(v) => Some(v),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("never"),
            Self::Unknown => f.write_str("unknown"),
            Self::Null => f.write_str("null"),
            Self::String => f.write_str("string"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
            Self::Literal(v) => write!(f, "{v}"),
            Self::List(element) => match element.as_ref() {
                Self::Union(_) => write!(f, "({element})[]"),
                _ => write!(f, "{element}[]"),
            },
            Self::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}

/// Shape of one key in a [`RecordShape`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShape {
    pub shape: ValueShape,

    /// Optional fields may be absent (or `null`).
    pub optional: bool,
}

impl FieldShape {
    pub fn required(shape: ValueShape) -> Self {
        Self {
            shape,
            optional: false,
        }
    }

    pub fn optional(shape: ValueShape) -> Self {
        Self {
            shape,
            optional: true,
        }
    }
}

/// Why an answer record does not fit a [`RecordShape`].
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeViolation {
    Missing {
        key: String,
    },
    Mismatch {
        key: String,
        expected: ValueShape,
        actual: &'static str,
    },
}

/// Shape of a whole answer record: known keys plus, if `open`, any other keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordShape {
    fields: Vec<(String, FieldShape)>,
    open: bool,
}

impl RecordShape {
    /// A closed record with no keys.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An open record with no known keys (any answers fit).
    pub fn open() -> Self {
        Self {
            fields: Vec::new(),
            open: true,
        }
    }

    /// Set or replace a key. A replaced key keeps its position.
    pub fn with_field(mut self, key: impl Into<String>, field: FieldShape) -> Self {
        self.set(key.into(), field);
        self
    }

    /// Mark the record as open or closed.
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    fn set(&mut self, key: String, field: FieldShape) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = field,
            None => self.fields.push((key, field)),
        }
    }

    /// Flat, right-biased merge: fields of `other` replace fields of `self`.
    pub fn merge(&self, other: &RecordShape) -> RecordShape {
        let mut merged = self.clone();
        for (key, field) in &other.fields {
            merged.set(key.clone(), field.clone());
        }
        merged.open = self.open || other.open;
        merged
    }

    pub fn get(&self, key: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldShape)> {
        self.fields.iter().map(|(k, f)| (k.as_str(), f))
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if at least one key must be present.
    pub fn has_mandatory(&self) -> bool {
        self.fields.iter().any(|(_, f)| !f.optional)
    }

    /// Check that `answers` fits this shape.
    ///
    /// Unknown keys are accepted regardless of `open`: earlier steps may have
    /// contributed keys that no shape tracks.
    pub fn check(&self, answers: &Answers) -> Result<(), ShapeViolation> {
        for (key, field) in &self.fields {
            match answers.get(key) {
                None | Some(Value::Null) if field.optional => {}
                None => return Err(ShapeViolation::Missing { key: key.clone() }),
                Some(value) if !field.shape.accepts(value) => {
                    return Err(ShapeViolation::Mismatch {
                        key: key.clone(),
                        expected: field.shape.clone(),
                        actual: value_type_name(value),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() && !self.open {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        let mut first = true;
        for (key, field) in &self.fields {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            let marker = if field.optional { "?" } else { "" };
            write!(f, "{key}{marker}: {}", field.shape)?;
        }
        if self.open {
            if !first {
                f.write_str("; ")?;
            }
            f.write_str("[key: string]: unknown")?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn union_flattens_and_dedupes() {
        let shape = ValueShape::union([
            ValueShape::literal("red"),
            ValueShape::union([ValueShape::literal("blue"), ValueShape::literal("red")]),
            ValueShape::Never,
        ]);
        assert_eq!(
            shape,
            ValueShape::Union(vec![ValueShape::literal("red"), ValueShape::literal("blue")])
        );
        assert_eq!(shape.to_string(), r#""red" | "blue""#);
    }

    #[test]
    fn union_edge_cases() {
        assert_eq!(ValueShape::union(Vec::new()), ValueShape::Never);
        assert_eq!(
            ValueShape::union([ValueShape::literal(1)]),
            ValueShape::literal(1)
        );
        assert_eq!(
            ValueShape::union([ValueShape::literal("a"), ValueShape::String]),
            ValueShape::String
        );
        assert_eq!(
            ValueShape::union([ValueShape::Number, ValueShape::Unknown]),
            ValueShape::Unknown
        );
    }

    #[test]
    fn accepts() {
        let colors = ValueShape::union([ValueShape::literal("red"), ValueShape::literal("blue")]);
        assert!(colors.accepts(&json!("red")));
        assert!(!colors.accepts(&json!("green")));

        let list = ValueShape::list(colors);
        assert!(list.accepts(&json!([])));
        assert!(list.accepts(&json!(["blue", "red"])));
        assert!(!list.accepts(&json!(["blue", 1])));
        assert!(!list.accepts(&json!("blue")));

        assert!(!ValueShape::Never.accepts(&json!(null)));
        assert!(ValueShape::Unknown.accepts(&json!({"a": 1})));
    }

    #[test]
    fn list_display() {
        let shape = ValueShape::list(ValueShape::union([
            ValueShape::literal(1),
            ValueShape::literal(2),
        ]));
        assert_eq!(shape.to_string(), "(1 | 2)[]");
        assert_eq!(ValueShape::list(ValueShape::String).to_string(), "string[]");
    }

    #[test]
    fn literals() {
        let shape = ValueShape::union([ValueShape::literal(1), ValueShape::literal(2)]);
        assert_eq!(shape.literals().unwrap(), vec![&json!(1), &json!(2)]);
        assert!(ValueShape::String.literals().is_none());
    }

    #[test]
    fn narrower_shapes_are_within_wider_ones() {
        let colors = ValueShape::union([ValueShape::literal("red"), ValueShape::literal("blue")]);
        assert!(colors.is_within(&ValueShape::String));
        assert!(!ValueShape::String.is_within(&colors));
        assert!(!colors.is_within(&ValueShape::Number));

        let picks = ValueShape::list(ValueShape::union([ValueShape::literal(1), ValueShape::literal(2)]));
        assert!(picks.is_within(&ValueShape::list(ValueShape::Number)));
        assert!(!picks.is_within(&ValueShape::list(ValueShape::String)));

        let maybe_number = ValueShape::union([ValueShape::Number, ValueShape::Null]);
        assert!(ValueShape::Number.is_within(&maybe_number));
        assert!(!maybe_number.is_within(&ValueShape::Number));

        assert!(ValueShape::Never.is_within(&ValueShape::Boolean));
        assert!(ValueShape::Boolean.is_within(&ValueShape::Unknown));
        assert!(!ValueShape::Unknown.is_within(&ValueShape::Boolean));
    }

    #[test]
    fn merge_is_flat_and_right_biased() {
        let prior = RecordShape::open()
            .with_field("x", FieldShape::required(ValueShape::Number))
            .with_field("y", FieldShape::optional(ValueShape::String));
        let next = RecordShape::empty().with_field("x", FieldShape::required(ValueShape::Boolean));

        let merged = prior.merge(&next);
        assert_eq!(
            merged.to_string(),
            "{ x: boolean; y?: string; [key: string]: unknown }"
        );
        assert!(merged.has_mandatory());
    }

    #[test]
    fn check_answers() {
        let shape = RecordShape::open()
            .with_field("age", FieldShape::required(ValueShape::Number))
            .with_field("title", FieldShape::optional(ValueShape::String));

        let ok = Answers::new().with("age", 65).with("extra", true);
        assert_eq!(shape.check(&ok), Ok(()));

        let missing = Answers::new().with("title", "Dr");
        assert_eq!(
            shape.check(&missing),
            Err(ShapeViolation::Missing {
                key: "age".to_string()
            })
        );

        let wrong = Answers::new().with("age", "old");
        assert!(matches!(
            shape.check(&wrong),
            Err(ShapeViolation::Mismatch { actual: "string", .. })
        ));
    }

    #[test]
    fn empty_display() {
        assert_eq!(RecordShape::empty().to_string(), "{}");
        assert_eq!(RecordShape::open().to_string(), "{ [key: string]: unknown }");
    }
}
