//! Requirement descriptors: what a question expects to find in prior answers.

use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::shape::{FieldShape, RecordShape, ValueShape};
use crate::ConfigError;

/// A type token could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed type token '{0}'")]
pub struct TokenError(pub String);

/// The expected type of one prior answer, written as a short token string.
///
/// Recognized tokens: `string`, `number`, `boolean`, `null`, `unknown`,
/// `Dict` (or `object`), `Array` / `Array<T>`, `string(a,b)`, `number(1,2)`
/// and `Opt<T>`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeToken {
    String,
    Number,
    Boolean,
    Null,
    Unknown,

    /// Any structured object.
    Object,

    /// A list, optionally with a known element type.
    Array(Option<Box<TypeToken>>),

    /// One of the listed strings.
    StringEnum(Vec<String>),

    /// One of the listed numbers.
    NumberEnum(Vec<Number>),

    /// The inner type, or absent.
    Opt(Box<TypeToken>),
}

impl TypeToken {
    /// The value shape this token stands for.
    ///
    /// `Opt<T>` maps to the shape of `T`; optionality lives on the record field.
    pub fn shape(&self) -> ValueShape {
        match self {
            Self::String => ValueShape::String,
            Self::Number => ValueShape::Number,
            Self::Boolean => ValueShape::Boolean,
            Self::Null => ValueShape::Null,
            Self::Unknown | Self::Object => ValueShape::Unknown,
            Self::Array(None) => ValueShape::list(ValueShape::Unknown),
            Self::Array(Some(element)) => ValueShape::list(element.shape()),
            Self::StringEnum(options) => {
                ValueShape::union(options.iter().map(|o| ValueShape::literal(o.as_str())))
            }
            Self::NumberEnum(options) => {
                ValueShape::union(options.iter().map(|n| ValueShape::literal(n.clone())))
            }
            Self::Opt(inner) => inner.shape(),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Opt(_))
    }
}

impl FromStr for TypeToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let malformed = || TokenError(s.to_string());

        let token = match s {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "null" => Self::Null,
            "unknown" => Self::Unknown,
            "Dict" | "object" => Self::Object,
            "Array" => Self::Array(None),
            _ => {
                if let Some(inner) = generic_arg(s, "Array") {
                    Self::Array(Some(Box::new(inner.parse()?)))
                } else if let Some(inner) = generic_arg(s, "Opt") {
                    Self::Opt(Box::new(inner.parse()?))
                } else if let Some(list) = enum_args(s, "string") {
                    Self::StringEnum(list.into_iter().map(str::to_string).collect())
                } else if let Some(list) = enum_args(s, "number") {
                    Self::NumberEnum(
                        list.into_iter()
                            .map(parse_number)
                            .collect::<Option<_>>()
                            .ok_or_else(malformed)?,
                    )
                } else {
                    return Err(malformed());
                }
            }
        };
        Ok(token)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
            Self::Null => f.write_str("null"),
            Self::Unknown => f.write_str("unknown"),
            Self::Object => f.write_str("Dict"),
            Self::Array(None) => f.write_str("Array"),
            Self::Array(Some(element)) => write!(f, "Array<{element}>"),
            Self::StringEnum(options) => write!(f, "string({})", options.join(",")),
            Self::NumberEnum(options) => {
                let options: Vec<String> = options.iter().map(Number::to_string).collect();
                write!(f, "number({})", options.join(","))
            }
            Self::Opt(inner) => write!(f, "Opt<{inner}>"),
        }
    }
}

/// `Name<inner>` → `inner`.
fn generic_arg<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?.strip_prefix('<')?.strip_suffix('>')
}

/// `name(a, b)` → `["a", "b"]`. Empty members are rejected.
fn enum_args<'a>(s: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let inner = s.strip_prefix(name)?.strip_prefix('(')?.strip_suffix(')')?;
    let members: Vec<&str> = inner.split(',').map(str::trim).collect();
    if members.iter().any(|m| m.is_empty()) {
        return None;
    }
    Some(members)
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(int) = s.parse::<i64>() {
        return Some(Number::from(int));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

/// One key's requirement.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub token: TypeToken,

    /// Optional keys may be absent from prior answers.
    pub optional: bool,
}

impl Requirement {
    pub fn is_optional(&self) -> bool {
        self.optional || self.token.is_optional()
    }

    pub fn field(&self) -> FieldShape {
        FieldShape {
            shape: self.token.shape(),
            optional: self.is_optional(),
        }
    }
}

/// Mapping from answer key to the type expected under it, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequirementDescriptor {
    entries: Vec<(String, Requirement)>,
}

impl RequirementDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to be present with a value of type `token`.
    pub fn require(mut self, key: impl Into<String>, token: TypeToken) -> Self {
        self.set(key.into(), Requirement {
            token,
            optional: false,
        });
        self
    }

    /// Accept `key` absent, or present with a value of type `token`.
    pub fn optional(mut self, key: impl Into<String>, token: TypeToken) -> Self {
        self.set(key.into(), Requirement {
            token,
            optional: true,
        });
        self
    }

    /// Parse `(key, token)` pairs. A trailing `?` on a key marks it optional.
    pub fn parse<K, T>(pairs: impl IntoIterator<Item = (K, T)>) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        T: AsRef<str>,
    {
        let mut descriptor = Self::new();
        for (key, token) in pairs {
            let (key, optional) = match key.as_ref().strip_suffix('?') {
                Some(stripped) => (stripped, true),
                None => (key.as_ref(), false),
            };
            let token = token
                .as_ref()
                .parse::<TypeToken>()
                .map_err(|TokenError(token)| ConfigError::MalformedToken {
                    key: key.to_string(),
                    token,
                })?;
            descriptor.set(key.to_string(), Requirement { token, optional });
        }
        Ok(descriptor)
    }

    fn set(&mut self, key: String, requirement: Requirement) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = requirement,
            None => self.entries.push((key, requirement)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Requirement> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Requirement)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accepts a JSON object of `key: "token"` pairs.
impl TryFrom<Value> for RequirementDescriptor {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = value else {
            return Err(ConfigError::MalformedToken {
                key: String::new(),
                token: value.to_string(),
            });
        };
        let mut pairs = Vec::with_capacity(map.len());
        for (key, token) in map {
            match token {
                Value::String(token) => pairs.push((key, token)),
                other => {
                    return Err(ConfigError::MalformedToken {
                        key,
                        token: other.to_string(),
                    });
                }
            }
        }
        Self::parse(pairs)
    }
}

/// The requirement context of a question factory.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Requirements {
    /// No requirements at all.
    #[default]
    None,
    Descriptor(RequirementDescriptor),
}

impl Requirements {
    pub fn resolve(&self) -> Resolved {
        resolve(self)
    }
}

impl From<RequirementDescriptor> for Requirements {
    fn from(descriptor: RequirementDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

/// The answer-context shape implied by a [`Requirements`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Open record of the required keys.
    pub shape: RecordShape,

    /// At least one key must be present, so invocation needs prior answers.
    pub mandatory: bool,
}

impl Resolved {
    /// No requirements: an open, empty shape.
    pub fn none() -> Self {
        Self {
            shape: RecordShape::open(),
            mandatory: false,
        }
    }
}

/// Resolve a requirement context into its record shape.
///
/// `Requirements::None` and an empty descriptor both resolve to an empty open
/// shape that is not mandatory.
pub fn resolve(requirements: &Requirements) -> Resolved {
    let Requirements::Descriptor(descriptor) = requirements else {
        return Resolved::none();
    };
    let shape = descriptor
        .iter()
        .fold(RecordShape::open(), |shape, (key, requirement)| {
            shape.with_field(key, requirement.field())
        });
    Resolved {
        mandatory: shape.has_mandatory(),
        shape,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_simple_tokens() {
        assert_eq!("string".parse::<TypeToken>().unwrap(), TypeToken::String);
        assert_eq!(" number ".parse::<TypeToken>().unwrap(), TypeToken::Number);
        assert_eq!("Dict".parse::<TypeToken>().unwrap(), TypeToken::Object);
        assert_eq!(
            "Array<string>".parse::<TypeToken>().unwrap(),
            TypeToken::Array(Some(Box::new(TypeToken::String)))
        );
    }

    #[test]
    fn parse_enumerations() {
        let token: TypeToken = "string(Mr, Mrs,Ms)".parse().unwrap();
        assert_eq!(
            token,
            TypeToken::StringEnum(vec!["Mr".into(), "Mrs".into(), "Ms".into()])
        );
        assert_eq!(token.shape().to_string(), r#""Mr" | "Mrs" | "Ms""#);

        let token: TypeToken = "number(1,2.5)".parse().unwrap();
        assert!(token.shape().accepts(&json!(1)));
        assert!(token.shape().accepts(&json!(2.5)));
        assert!(!token.shape().accepts(&json!(3)));
    }

    #[test]
    fn parse_optional_token() {
        let token: TypeToken = "Opt<string(Mr,Mrs,Ms)>".parse().unwrap();
        assert!(token.is_optional());
        assert_eq!(token.to_string(), "Opt<string(Mr,Mrs,Ms)>");
    }

    #[test]
    fn malformed_tokens() {
        for bad in ["", "str", "string()", "string(a,,b)", "number(x)", "Opt<>", "Array<"] {
            assert!(bad.parse::<TypeToken>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn no_requirements_resolve_to_empty_shape() {
        let none = resolve(&Requirements::None);
        let empty = resolve(&RequirementDescriptor::new().into());
        assert_eq!(none, empty);
        assert!(!none.mandatory);
        assert!(none.shape.is_empty());
        assert!(none.shape.is_open());
    }

    #[test]
    fn mandatory_and_optional_keys() {
        let descriptor =
            RequirementDescriptor::parse([("age", "number"), ("title?", "string(Mr,Mrs,Ms)")])
                .unwrap();
        let resolved = resolve(&descriptor.into());

        assert!(resolved.mandatory);
        assert_eq!(
            resolved.shape.to_string(),
            r#"{ age: number; title?: "Mr" | "Mrs" | "Ms"; [key: string]: unknown }"#
        );
    }

    #[test]
    fn all_optional_is_not_mandatory() {
        let descriptor = RequirementDescriptor::new()
            .optional("nickname", TypeToken::String)
            .require("title", TypeToken::Opt(Box::new(TypeToken::String)));
        assert!(!resolve(&descriptor.into()).mandatory);
    }

    #[test]
    fn from_json_object() {
        let descriptor = RequirementDescriptor::try_from(json!({ "age": "number" })).unwrap();
        assert_eq!(descriptor.get("age").unwrap().token, TypeToken::Number);

        let err = RequirementDescriptor::try_from(json!({ "age": "numeric" })).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MalformedToken {
                key: "age".into(),
                token: "numeric".into()
            }
        );

        assert!(RequirementDescriptor::try_from(json!({ "age": 1 })).is_err());
        assert!(RequirementDescriptor::try_from(json!(["age"])).is_err());
    }
}
