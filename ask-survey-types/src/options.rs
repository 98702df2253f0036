use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::Answers;

/// Validation hook: `Err(message)` rejects the value.
pub type Validator = Arc<dyn Fn(&Value, &Answers) -> Result<(), String> + Send + Sync>;

/// Transforms the raw answer before it is stored.
pub type Filter = Arc<dyn Fn(Value, &Answers) -> Value + Send + Sync>;

/// Decides whether a question is asked at all.
pub type Condition = Arc<dyn Fn(&Answers) -> bool + Send + Sync>;

/// Formats the answer for display; the flag is `true` once the answer is final.
pub type Transformer = Arc<dyn Fn(&Value, &Answers, bool) -> String + Send + Sync>;

/// Per-question settings handed to the renderer untouched.
///
/// The only setting with an effect outside the renderer is `default` on
/// `checkbox` questions, which pre-checks the matching choices.
#[derive(Clone, Default)]
pub struct QuestionOptions {
    /// Pre-filled answer, or pre-checked values for `checkbox`.
    pub default: Option<Value>,

    /// Reject an empty answer. Enforced by the renderer.
    pub required: Option<bool>,

    /// `Some(false)` skips the question when its key is already answered.
    pub ask_answered: Option<bool>,

    pub validate: Option<Validator>,
    pub filter: Option<Filter>,
    pub when: Option<Condition>,
    pub transformer: Option<Transformer>,

    pub page_size: Option<usize>,
    pub loop_choices: Option<bool>,

    /// Mask character for `password`.
    pub mask: Option<char>,

    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,

    /// Start `expand` questions with every choice listed.
    pub expanded: Option<bool>,

    /// Renderer-specific settings (`theme`, `helpMode`, ...).
    pub extra: Map<String, Value>,
}

impl QuestionOptions {
    /// Values that should start out checked, taken from `default`.
    pub fn checked_values(&self) -> Option<&[Value]> {
        match self.default.as_ref()? {
            Value::Array(items) => Some(items),
            single => Some(std::slice::from_ref(single)),
        }
    }

    /// Evaluate `when`. Questions without a condition are always asked.
    pub fn is_enabled(&self, answers: &Answers) -> bool {
        self.when.as_ref().is_none_or(|when| when(answers))
    }

    /// Run `validate`, accepting everything when no validator is set.
    pub fn check(&self, value: &Value, answers: &Answers) -> Result<(), String> {
        match &self.validate {
            Some(validate) => validate(value, answers),
            None => Ok(()),
        }
    }

    /// Run `filter`, passing the value through when no filter is set.
    pub fn apply_filter(&self, value: Value, answers: &Answers) -> Value {
        match &self.filter {
            Some(filter) => filter(value, answers),
            None => value,
        }
    }
}

impl fmt::Debug for QuestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hook = |present: bool| if present { "Some(<fn>)" } else { "None" };
        f.debug_struct("QuestionOptions")
            .field("default", &self.default)
            .field("required", &self.required)
            .field("ask_answered", &self.ask_answered)
            .field("validate", &format_args!("{}", hook(self.validate.is_some())))
            .field("filter", &format_args!("{}", hook(self.filter.is_some())))
            .field("when", &format_args!("{}", hook(self.when.is_some())))
            .field("transformer", &format_args!("{}", hook(self.transformer.is_some())))
            .field("page_size", &self.page_size)
            .field("loop_choices", &self.loop_choices)
            .field("mask", &self.mask)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .field("expanded", &self.expanded)
            .field("extra", &self.extra)
            .finish()
    }
}
