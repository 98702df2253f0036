use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The kind of question, determining how it is rendered and what it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Single-line text input.
    Input,

    /// Numeric input.
    Number,

    /// Yes/no confirmation.
    Confirm,

    /// Pick exactly one choice from a list.
    Select,

    /// Pick exactly one choice by typing its index.
    Rawlist,

    /// Pick exactly one choice by its accelerator key.
    Expand,

    /// Free-form text, or one of the choices when a source is supplied.
    Search,

    /// Pick any number of choices.
    Checkbox,

    /// Masked text input.
    Password,

    /// Multi-line text input (opens the user's editor).
    Editor,
}

impl QuestionType {
    /// Every supported question type, in declaration order.
    pub const ALL: [QuestionType; 10] = [
        Self::Input,
        Self::Number,
        Self::Confirm,
        Self::Select,
        Self::Rawlist,
        Self::Expand,
        Self::Search,
        Self::Checkbox,
        Self::Password,
        Self::Editor,
    ];

    /// The lowercase name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Number => "number",
            Self::Confirm => "confirm",
            Self::Select => "select",
            Self::Rawlist => "rawlist",
            Self::Expand => "expand",
            Self::Search => "search",
            Self::Checkbox => "checkbox",
            Self::Password => "password",
            Self::Editor => "editor",
        }
    }

    /// Check if this type accepts a set of choices.
    pub fn has_choices(&self) -> bool {
        matches!(
            self,
            Self::Select | Self::Rawlist | Self::Expand | Self::Search | Self::Checkbox
        )
    }

    /// Check if this type cannot be built without at least one choice.
    ///
    /// `search` accepts choices but falls back to free-form text without them.
    pub fn requires_choices(&self) -> bool {
        self.has_choices() && *self != Self::Search
    }

    /// Check if this type lets the user pick more than one choice.
    pub fn is_multi_select(&self) -> bool {
        matches!(self, Self::Checkbox)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownQuestionType(s.to_string()))
    }
}
