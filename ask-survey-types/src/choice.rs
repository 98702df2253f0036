//! Choice definitions and their normalization into canonical [`Choice`] lists.
//!
//! Choices can be written in several ways: a list of scalars, a list of full
//! choices, a dictionary keyed by display name (whose values are scalars,
//! `[value, description]` tuples, or partial choices), or a mix of these.
//! [`normalize`] turns any of them into one ordered list of [`Choice`]s.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use crate::ConfigError;

/// Keys a dictionary value may carry and still count as a partial choice.
const PROXY_KEYS: [&str; 7] = [
    "value",
    "description",
    "checked",
    "short",
    "disabled",
    "key",
    "kind",
];

/// A partial choice has a `value`, only known choice keys, and no foreign `kind`.
fn is_proxy(map: &Map<String, Value>) -> bool {
    map.contains_key("value")
        && map.keys().all(|k| PROXY_KEYS.contains(&k.as_str()))
        && map
            .get("kind")
            .is_none_or(|kind| kind.as_str() == Some(Choice::KIND))
}

/// Whether a choice can be picked; a reason doubles as a help tip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Disabled {
    Flag(bool),
    Reason(String),
}

impl Disabled {
    pub fn is_disabled(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Reason(_) => true,
        }
    }

    /// The reason text, if one was given.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Flag(_) => None,
            Self::Reason(reason) => Some(reason),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(flag) => Some(Self::Flag(*flag)),
            Value::String(reason) => Some(Self::Reason(reason.clone())),
            _ => None,
        }
    }
}

/// A fully qualified choice. Serializes with the marker `"kind": "choice"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename = "choice")]
pub struct Choice {
    /// Display label.
    pub name: String,

    /// The value the answer is set to when this choice is picked.
    pub value: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Initial state in multi-select questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,

    /// Label shown after the prompt completes, instead of `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<Disabled>,

    /// Accelerator key for `expand` questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<char>,
}

impl Choice {
    /// The literal marker carried by every serialized choice.
    pub const KIND: &'static str = "choice";

    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
            checked: None,
            short: None,
            disabled: None,
            key: None,
        }
    }

    /// A choice whose name is the stringified value.
    pub fn from_value(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(display_name(&value), value)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(Disabled::Flag(disabled));
        self
    }

    pub fn with_disabled_reason(mut self, reason: impl Into<String>) -> Self {
        self.disabled = Some(Disabled::Reason(reason.into()));
        self
    }

    pub fn with_key(mut self, key: char) -> Self {
        self.key = Some(key);
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked == Some(true)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.as_ref().is_some_and(Disabled::is_disabled)
    }

    fn from_object(map: &Map<String, Value>) -> Self {
        let proxy = ChoiceProxy::from_object(map);
        let name = map
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| display_name(&proxy.value));
        proxy.into_choice(name)
    }
}

/// A choice without a name, used as a dictionary value; the key supplies the name.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceProxy {
    pub value: Value,
    pub description: Option<String>,
    pub checked: Option<bool>,
    pub short: Option<String>,
    pub disabled: Option<Disabled>,
    pub key: Option<char>,
}

impl ChoiceProxy {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            description: None,
            checked: None,
            short: None,
            disabled: None,
            key: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(Disabled::Flag(disabled));
        self
    }

    pub fn with_disabled_reason(mut self, reason: impl Into<String>) -> Self {
        self.disabled = Some(Disabled::Reason(reason.into()));
        self
    }

    pub fn with_key(mut self, key: char) -> Self {
        self.key = Some(key);
        self
    }

    /// Complete this proxy into a [`Choice`] with the given name.
    pub fn into_choice(self, name: impl Into<String>) -> Choice {
        Choice {
            name: name.into(),
            value: self.value,
            description: self.description,
            checked: self.checked,
            short: self.short,
            disabled: self.disabled,
            key: self.key,
        }
    }

    fn from_object(map: &Map<String, Value>) -> Self {
        let text = |field: &str| map.get(field).and_then(Value::as_str).map(str::to_string);
        Self {
            value: map.get("value").cloned().unwrap_or(Value::Null),
            description: text("description"),
            checked: map.get("checked").and_then(Value::as_bool),
            short: text("short"),
            disabled: map.get("disabled").and_then(Disabled::from_value),
            key: map
                .get("key")
                .and_then(Value::as_str)
                .and_then(single_char),
        }
    }
}

/// The value side of one dictionary entry.
#[derive(Debug, Clone, PartialEq)]
pub enum DictValue {
    /// The value itself (scalar or structured payload).
    Scalar(Value),

    /// `[value, description]`.
    Tuple(Value, String),

    /// A partial choice; the dictionary key becomes its name.
    Proxy(ChoiceProxy),

    /// An object that defines its own `name`. Rejected by [`normalize`].
    Ambiguous(Map<String, Value>),
}

impl DictValue {
    fn classify(value: Value) -> Self {
        match value {
            Value::Array(items) if items.len() == 2 && items[1].is_string() => {
                let mut items = items.into_iter();
                let value = items.next().unwrap_or(Value::Null);
                let description = items
                    .next()
                    .and_then(|d| d.as_str().map(str::to_string))
                    .unwrap_or_default();
                Self::Tuple(value, description)
            }
            Value::Object(map) if map.contains_key("name") => Self::Ambiguous(map),
            Value::Object(map) if is_proxy(&map) => {
                Self::Proxy(ChoiceProxy::from_object(&map))
            }
            other => Self::Scalar(other),
        }
    }
}

/// Choices keyed by display name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceDict {
    entries: Vec<(String, DictValue)>,
}

impl ChoiceDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// `name => value`.
    pub fn entry(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries
            .push((name.into(), DictValue::Scalar(value.into())));
        self
    }

    /// `name => [value, description]`.
    pub fn tuple(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
        description: impl Into<String>,
    ) -> Self {
        self.entries.push((
            name.into(),
            DictValue::Tuple(value.into(), description.into()),
        ));
        self
    }

    /// `name => { value, ... }`.
    pub fn proxy(mut self, name: impl Into<String>, proxy: ChoiceProxy) -> Self {
        self.entries.push((name.into(), DictValue::Proxy(proxy)));
        self
    }

    /// Add an already classified entry.
    pub fn push(&mut self, name: impl Into<String>, value: DictValue) {
        self.entries.push((name.into(), value));
    }

    pub fn entries(&self) -> &[(String, DictValue)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn classify(map: Map<String, Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(name, value)| (name, DictValue::classify(value)))
                .collect(),
        }
    }

    fn expand_into(&self, out: &mut Vec<Choice>) -> Result<(), ConfigError> {
        for (name, value) in &self.entries {
            let choice = match value {
                DictValue::Scalar(v) => Choice::new(name.clone(), v.clone()),
                DictValue::Tuple(v, description) => {
                    Choice::new(name.clone(), v.clone()).with_description(description.clone())
                }
                DictValue::Proxy(proxy) => proxy.clone().into_choice(name.clone()),
                DictValue::Ambiguous(_) => {
                    return Err(ConfigError::AmbiguousChoice { name: name.clone() });
                }
            };
            out.push(choice);
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ChoiceDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), DictValue::Scalar(v.into())))
                .collect(),
        }
    }
}

/// One element of a choice list.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceElement {
    /// Wrapped as a choice named after the stringified value.
    Scalar(Value),

    /// Passed through unchanged.
    Choice(Choice),

    /// Expanded in place, one choice per entry.
    Dict(ChoiceDict),

    /// Matches no known shape; dropped during normalization.
    Unrecognized(Value),
}

impl ChoiceElement {
    fn classify(value: Value) -> Self {
        match value {
            Value::Object(map) if map.contains_key("value") => {
                Self::Choice(Choice::from_object(&map))
            }
            Value::Object(map) => Self::Dict(ChoiceDict::classify(map)),
            Value::Array(_) => Self::Unrecognized(value),
            scalar => Self::Scalar(scalar),
        }
    }
}

impl From<Choice> for ChoiceElement {
    fn from(choice: Choice) -> Self {
        Self::Choice(choice)
    }
}

impl From<ChoiceDict> for ChoiceElement {
    fn from(dict: ChoiceDict) -> Self {
        Self::Dict(dict)
    }
}

/// Any supported representation of a set of choices.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceSource {
    List(Vec<ChoiceElement>),
    Dict(ChoiceDict),
}

impl ChoiceSource {
    /// A list of scalar values.
    pub fn values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::List(
            values
                .into_iter()
                .map(|v| ChoiceElement::Scalar(v.into()))
                .collect(),
        )
    }

    /// A list of fully qualified choices.
    pub fn choices(choices: impl IntoIterator<Item = Choice>) -> Self {
        Self::List(choices.into_iter().map(ChoiceElement::Choice).collect())
    }
}

impl From<ChoiceDict> for ChoiceSource {
    fn from(dict: ChoiceDict) -> Self {
        Self::Dict(dict)
    }
}

impl From<Vec<ChoiceElement>> for ChoiceSource {
    fn from(elements: Vec<ChoiceElement>) -> Self {
        Self::List(elements)
    }
}

impl From<Vec<Choice>> for ChoiceSource {
    fn from(choices: Vec<Choice>) -> Self {
        Self::choices(choices)
    }
}

impl<V: Into<Value>, const N: usize> From<[V; N]> for ChoiceSource {
    fn from(values: [V; N]) -> Self {
        Self::values(values)
    }
}

/// Classify dynamic input: arrays become lists, objects become dictionaries.
///
/// Any other value is a single unrecognized element.
impl From<Value> for ChoiceSource {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items.into_iter().map(ChoiceElement::classify).collect()),
            Value::Object(map) => Self::Dict(ChoiceDict::classify(map)),
            other => Self::List(vec![ChoiceElement::Unrecognized(other)]),
        }
    }
}

/// Normalize any choice representation into an ordered list of [`Choice`]s.
///
/// Order follows the source: list index order, dictionary insertion order.
/// Elements of an unrecognized shape are dropped without error, which keeps
/// normalization total. Dictionaries inside a list are expanded one level deep.
///
/// Every choice whose value is in `checked` gets `checked: Some(true)`; other
/// choices keep whatever `checked` they were defined with.
///
/// The only error is [`ConfigError::AmbiguousChoice`], for a dictionary value
/// object that carries its own `name`.
pub fn normalize(
    source: &ChoiceSource,
    checked: Option<&[Value]>,
) -> Result<Vec<Choice>, ConfigError> {
    let mut choices = Vec::new();
    match source {
        ChoiceSource::List(elements) => {
            for element in elements {
                match element {
                    ChoiceElement::Scalar(value) => choices.push(Choice::from_value(value.clone())),
                    ChoiceElement::Choice(choice) => choices.push(choice.clone()),
                    ChoiceElement::Dict(dict) => dict.expand_into(&mut choices)?,
                    ChoiceElement::Unrecognized(value) => {
                        trace!(element = %value, "dropping unrecognized choice element");
                    }
                }
            }
        }
        ChoiceSource::Dict(dict) => dict.expand_into(&mut choices)?,
    }

    if let Some(checked) = checked {
        for choice in &mut choices {
            if checked.contains(&choice.value) {
                choice.checked = Some(true);
            }
        }
    }

    Ok(choices)
}

/// The values a question over these choices could produce, in order.
pub fn choice_values(choices: &[Choice]) -> Vec<&Value> {
    choices.iter().map(|c| &c.value).collect()
}

/// Default display name for a value: strings verbatim, everything else as JSON text.
pub fn display_name(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
