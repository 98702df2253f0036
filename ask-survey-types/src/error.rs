use crate::QuestionType;

/// Error raised while building questions or surveys, before anything is rendered.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A question was built with an empty answer key.
    #[error("Question property name must not be empty")]
    EmptyProp,

    /// A choice-bearing question ended up with no choices after normalization.
    #[error("Question '{prop}' of type {question_type} has no choices")]
    NoChoices {
        prop: String,
        question_type: QuestionType,
    },

    /// A dictionary entry's value is an object that carries its own `name`.
    #[error("Choice '{name}' is ambiguous: a dictionary value must not define `name`")]
    AmbiguousChoice { name: String },

    /// A requirement token could not be parsed.
    #[error("Malformed type token '{token}' for requirement '{key}'")]
    MalformedToken { key: String, token: String },

    /// Two `expand` choices share an accelerator key (or use the reserved `h`).
    #[error("Question '{prop}' binds key '{key}' more than once")]
    DuplicateKey { prop: String, key: char },

    /// A survey step requires a key that neither the initial state nor an earlier step provides.
    #[error("Step {step} requires '{key}', which no earlier step provides")]
    UnsatisfiedRequirement { step: usize, key: String },

    /// An earlier step provides a required key, but with an incompatible shape.
    #[error("Step {step} expects '{key}' to be {expected}, but earlier steps provide {actual}")]
    RequirementTypeMismatch {
        step: usize,
        key: String,
        expected: String,
        actual: String,
    },

    /// A question type name was not recognized.
    #[error("Unknown question type: {0}")]
    UnknownQuestionType(String),
}

/// Error type for running questions and surveys.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// User cancelled the survey (Ctrl+C, closed window, etc.)
    #[error("Survey cancelled by user")]
    Cancelled,

    /// The question has mandatory requirements but was invoked without answers.
    #[error("Question '{prop}' requires prior answers")]
    MissingAnswers { prop: String },

    /// A mandatory requirement key is absent from the prior answers.
    #[error("Question '{prop}' requires '{key}' in prior answers")]
    UnmetRequirement { prop: String, key: String },

    /// A requirement key is present but holds a value of the wrong shape.
    #[error("Question '{prop}' expects '{key}' to be {expected}, got {actual}")]
    RequirementMismatch {
        prop: String,
        key: String,
        expected: String,
        actual: &'static str,
    },

    /// Failure reported by the renderer, passed through as-is.
    #[error(transparent)]
    Render(#[from] anyhow::Error),
}

impl SurveyError {
    /// Create a render error from any error type.
    pub fn render(err: impl Into<anyhow::Error>) -> Self {
        Self::Render(err.into())
    }

    /// Check if this error represents user cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("terminal went away")]
    struct Gone;

    #[test]
    fn render_error_is_transparent() {
        let err = SurveyError::render(Gone);
        assert_eq!(err.to_string(), "terminal went away");

        let SurveyError::Render(inner) = err else {
            panic!("expected render error");
        };
        assert!(inner.downcast_ref::<Gone>().is_some());
    }

    #[test]
    fn config_error_messages() {
        let err = ConfigError::NoChoices {
            prop: "color".to_string(),
            question_type: QuestionType::Select,
        };
        assert_eq!(err.to_string(), "Question 'color' of type select has no choices");

        let err = ConfigError::DuplicateKey {
            prop: "action".to_string(),
            key: 'y',
        };
        assert_eq!(err.to_string(), "Question 'action' binds key 'y' more than once");

        let err = ConfigError::RequirementTypeMismatch {
            step: 2,
            key: "age".to_string(),
            expected: "number".to_string(),
            actual: "string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Step 2 expects 'age' to be number, but earlier steps provide string"
        );
    }

    #[test]
    fn cancelled() {
        assert!(SurveyError::Cancelled.is_cancelled());
        assert!(
            !SurveyError::MissingAnswers {
                prop: "smoke".into()
            }
            .is_cancelled()
        );
    }
}
