use std::sync::Arc;

use async_trait::async_trait;

use crate::{Answers, Choice, QuestionOptions, QuestionType, SurveyError};

/// Everything a renderer needs to ask one question.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub question_type: QuestionType,

    /// Key the answer is stored under.
    pub name: String,

    /// The prompt, already evaluated against `answers`.
    pub message: String,

    /// Normalized choices; empty for choice-less kinds.
    pub choices: Vec<Choice>,

    pub options: QuestionOptions,

    /// Answers collected so far, for the hooks in `options`.
    pub answers: Answers,
}

/// The prompt-rendering collaborator.
///
/// Implementations show one question and resolve to a record holding exactly
/// one key, `config.name`, whose value fits the question's produced shape. A
/// skipped question (`when` returned `false`) resolves to an empty record.
///
/// Renderer failures propagate to the caller untouched; nothing in this crate
/// retries a render.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, config: RenderConfig) -> Result<Answers, SurveyError>;
}

#[async_trait]
impl<R: Renderer + ?Sized> Renderer for Arc<R> {
    async fn render(&self, config: RenderConfig) -> Result<Answers, SurveyError> {
        (**self).render(config).await
    }
}
