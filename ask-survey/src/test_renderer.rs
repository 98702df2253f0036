//! Test renderer for asking questions without user interaction.
//!
//! `TestRenderer` answers from pre-defined responses and falls back to a
//! fixed answer per question type. It records every question it was asked.
//!
//! # Example
//!
//! ```rust,ignore
//! use ask_survey::{Ask, TestRenderer};
//!
//! let renderer = TestRenderer::new().with_response("name", "Alice");
//! let ask = Ask::new(renderer.clone());
//!
//! let answers = ask.input("name", "Name?").build()?.ask(None).await?;
//! assert_eq!(answers.get_string("name")?, "Alice");
//! assert_eq!(renderer.calls()[0].message, "Name?");
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::{Answers, Choice, QuestionType, RenderConfig, Renderer, SurveyError};

/// Answer for text-like questions without a configured response.
pub const MOCK_TEXT: &str = "Mock Answer";

/// Answer for `number` questions without a configured response.
pub const MOCK_NUMBER: i64 = 30;

/// One question as the renderer saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuestion {
    pub name: String,
    pub message: String,
    pub question_type: QuestionType,
    pub choices: Vec<Choice>,
}

/// A renderer that returns pre-configured responses.
///
/// Clones share the call log, so a clone handed to [`Ask`](crate::Ask) can
/// still be inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct TestRenderer {
    responses: HashMap<String, Value>,
    rejected: HashSet<String>,
    calls: Arc<Mutex<Vec<RenderedQuestion>>>,
}

/// Error type for TestRenderer.
#[derive(Debug, thiserror::Error)]
pub enum TestRendererError {
    #[error("Rejected question '{0}'")]
    Rejected(String),

    #[error("Validation failed for '{name}': {message}")]
    ValidationFailed { name: String, message: String },

    #[error("No answer for '{name}' of type {question_type}")]
    NoAnswer {
        name: String,
        question_type: QuestionType,
    },
}

impl TestRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the question with key `name` with `value`.
    ///
    /// Configured responses go through the question's `validate` and `filter`.
    pub fn with_response(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.responses.insert(name.into(), value.into());
        self
    }

    /// Fail the question with key `name` with a render error.
    pub fn rejecting(mut self, name: impl Into<String>) -> Self {
        self.rejected.insert(name.into());
        self
    }

    /// Every question rendered so far, oldest first.
    pub fn calls(&self) -> Vec<RenderedQuestion> {
        self.calls.lock().clone()
    }

    fn answer(&self, config: &RenderConfig) -> Result<Value, TestRendererError> {
        if let Some(value) = self.responses.get(&config.name) {
            let options = &config.options;
            options
                .check(value, &config.answers)
                .map_err(|message| TestRendererError::ValidationFailed {
                    name: config.name.clone(),
                    message,
                })?;
            return Ok(options.apply_filter(value.clone(), &config.answers));
        }

        let no_answer = || TestRendererError::NoAnswer {
            name: config.name.clone(),
            question_type: config.question_type,
        };

        let value = match config.question_type {
            QuestionType::Input | QuestionType::Password | QuestionType::Editor => {
                Value::from(MOCK_TEXT)
            }
            QuestionType::Search if config.choices.is_empty() => Value::from(MOCK_TEXT),
            QuestionType::Number => Value::from(MOCK_NUMBER),
            QuestionType::Confirm => config
                .options
                .default
                .clone()
                .filter(Value::is_boolean)
                .unwrap_or(Value::Bool(false)),
            QuestionType::Select
            | QuestionType::Rawlist
            | QuestionType::Expand
            | QuestionType::Search => config
                .choices
                .iter()
                .find(|c| !c.is_disabled())
                .map(|c| c.value.clone())
                .ok_or_else(no_answer)?,
            QuestionType::Checkbox => Value::Array(
                config
                    .choices
                    .iter()
                    .filter(|c| c.is_checked())
                    .map(|c| c.value.clone())
                    .collect(),
            ),
        };
        Ok(value)
    }
}

#[async_trait]
impl Renderer for TestRenderer {
    async fn render(&self, config: RenderConfig) -> Result<Answers, SurveyError> {
        self.calls.lock().push(RenderedQuestion {
            name: config.name.clone(),
            message: config.message.clone(),
            question_type: config.question_type,
            choices: config.choices.clone(),
        });

        if self.rejected.contains(&config.name) {
            return Err(SurveyError::render(TestRendererError::Rejected(config.name)));
        }
        if !config.options.is_enabled(&config.answers) {
            return Ok(Answers::new());
        }

        let value = self.answer(&config).map_err(SurveyError::render)?;
        Ok(Answers::new().with(config.name, value))
    }
}
