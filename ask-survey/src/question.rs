use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::{
    AnswerShape, Answers, Choice, QuestionOptions, QuestionType, RenderConfig, Renderer,
    Requirements, Resolved, ShapeViolation, SurveyError,
};

/// Prompt text, fixed or computed from the answers collected so far.
#[derive(Clone)]
pub enum Prompt {
    Static(String),
    Dynamic(Arc<dyn Fn(&Answers) -> String + Send + Sync>),
}

impl Prompt {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&Answers) -> String + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }

    /// The message to show for `answers`. Dynamic prompts run on every call.
    pub fn evaluate(&self, answers: &Answers) -> String {
        match self {
            Self::Static(text) => text.clone(),
            Self::Dynamic(f) => f(answers),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Self::Static(text.to_string())
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Self::Static(text)
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

pub(crate) struct QuestionParts {
    pub renderer: Arc<dyn Renderer>,
    pub requirements: Requirements,
    pub resolved: Resolved,
    pub shape: AnswerShape,
    pub question_type: QuestionType,
    pub prop: String,
    pub prompt: Prompt,
    pub choices: Vec<Choice>,
    pub options: QuestionOptions,
}

/// A built question: metadata plus the ability to ask it.
///
/// Immutable once built and cheap to clone. Every call to [`Question::ask`] is
/// independent of the others.
#[derive(Clone)]
pub struct Question {
    inner: Arc<QuestionParts>,
}

impl Question {
    /// Marker distinguishing questions from plain steps.
    pub const KIND: &'static str = "question";

    pub(crate) fn from_parts(parts: QuestionParts) -> Self {
        Self {
            inner: Arc::new(parts),
        }
    }

    pub fn kind(&self) -> &'static str {
        Self::KIND
    }

    /// The answer key this question fills.
    pub fn prop(&self) -> &str {
        &self.inner.prop
    }

    pub fn prompt(&self) -> &Prompt {
        &self.inner.prompt
    }

    pub fn question_type(&self) -> QuestionType {
        self.inner.question_type
    }

    /// Normalized choices, fixed at build time. Empty for choice-less kinds.
    pub fn choices(&self) -> &[Choice] {
        &self.inner.choices
    }

    /// Every value this question can answer with, in choice order.
    pub fn choice_values(&self) -> Vec<&Value> {
        crate::choice_values(&self.inner.choices)
    }

    pub fn options(&self) -> &QuestionOptions {
        &self.inner.options
    }

    pub fn requirements(&self) -> &Requirements {
        &self.inner.requirements
    }

    pub(crate) fn resolved(&self) -> &Resolved {
        &self.inner.resolved
    }

    pub fn answer_shape(&self) -> &AnswerShape {
        &self.inner.shape
    }

    /// Check if [`ask`](Self::ask) must be given prior answers.
    pub fn requires_answers(&self) -> bool {
        self.inner.resolved.mandatory
    }

    /// Ask the question and merge the answer into `answers`.
    ///
    /// The requirement checks run first, so a question with unmet requirements
    /// never reaches the renderer. The answer overwrites any earlier value for
    /// the same key.
    pub async fn ask(&self, answers: Option<Answers>) -> Result<Answers, SurveyError> {
        let answers = self.check_requirements(answers)?;
        let inner = &self.inner;
        let message = inner.prompt.evaluate(&answers);

        debug!(
            prop = %inner.prop,
            question_type = %inner.question_type,
            "rendering question"
        );

        let config = RenderConfig {
            question_type: inner.question_type,
            name: inner.prop.clone(),
            message,
            choices: inner.choices.clone(),
            options: inner.options.clone(),
            answers: answers.clone(),
        };
        let rendered = inner.renderer.render(config).await?;

        let mut merged = answers;
        merged.merge(rendered);
        Ok(merged)
    }

    fn check_requirements(&self, answers: Option<Answers>) -> Result<Answers, SurveyError> {
        let prop = || self.inner.prop.clone();
        let answers = match answers {
            Some(answers) => answers,
            None if self.requires_answers() => {
                return Err(SurveyError::MissingAnswers { prop: prop() });
            }
            None => Answers::new(),
        };

        self.inner
            .resolved
            .shape
            .check(&answers)
            .map_err(|violation| match violation {
                ShapeViolation::Missing { key } => SurveyError::UnmetRequirement { prop: prop(), key },
                ShapeViolation::Mismatch {
                    key,
                    expected,
                    actual,
                } => SurveyError::RequirementMismatch {
                    prop: prop(),
                    key,
                    expected: expected.to_string(),
                    actual,
                },
            })?;

        Ok(answers)
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("prop", &self.inner.prop)
            .field("prompt", &self.inner.prompt)
            .field("question_type", &self.inner.question_type)
            .field("choices", &self.inner.choices)
            .field("requirements", &self.inner.requirements)
            .finish_non_exhaustive()
    }
}
