//! The question factory.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::question::{Prompt, Question, QuestionParts};
use crate::{
    Answers, Choice, ChoiceSource, ConfigError, QuestionOptions, QuestionType, Renderer,
    Requirements, answer_shape, normalize,
};

/// Key `expand` prompts reserve for listing all choices.
const EXPAND_HELP_KEY: char = 'h';

/// Root factory for questions.
///
/// Holds the renderer every built question talks to and the requirement
/// context new questions are built with. Deriving a factory with
/// [`with_requirements`](Self::with_requirements) leaves the original untouched.
#[derive(Clone)]
pub struct Ask {
    renderer: Arc<dyn Renderer>,
    requirements: Requirements,
}

/// Create a root factory without requirements.
pub fn ask(renderer: impl Renderer + 'static) -> Ask {
    Ask::new(renderer)
}

impl Ask {
    pub fn new(renderer: impl Renderer + 'static) -> Self {
        Self::with_renderer(Arc::new(renderer))
    }

    /// Create a factory around an already shared renderer.
    pub fn with_renderer(renderer: Arc<dyn Renderer>) -> Self {
        Self {
            renderer,
            requirements: Requirements::None,
        }
    }

    /// A factory whose questions expect `requirements` in their prior answers.
    pub fn with_requirements(&self, requirements: impl Into<Requirements>) -> Self {
        Self {
            renderer: Arc::clone(&self.renderer),
            requirements: requirements.into(),
        }
    }

    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    fn builder(
        &self,
        question_type: QuestionType,
        prop: impl Into<String>,
        prompt: impl Into<Prompt>,
        choices: Option<ChoiceSource>,
    ) -> QuestionBuilder {
        QuestionBuilder {
            renderer: Arc::clone(&self.renderer),
            requirements: self.requirements.clone(),
            question_type,
            prop: prop.into(),
            prompt: prompt.into(),
            choices,
            options: QuestionOptions::default(),
        }
    }

    /// Single-line text.
    pub fn input(&self, prop: impl Into<String>, prompt: impl Into<Prompt>) -> QuestionBuilder {
        self.builder(QuestionType::Input, prop, prompt, None)
    }

    pub fn number(&self, prop: impl Into<String>, prompt: impl Into<Prompt>) -> QuestionBuilder {
        self.builder(QuestionType::Number, prop, prompt, None)
    }

    /// Masked text. Set the mask character with [`QuestionBuilder::mask`].
    pub fn password(&self, prop: impl Into<String>, prompt: impl Into<Prompt>) -> QuestionBuilder {
        self.builder(QuestionType::Password, prop, prompt, None)
    }

    pub fn confirm(&self, prop: impl Into<String>, prompt: impl Into<Prompt>) -> QuestionBuilder {
        self.builder(QuestionType::Confirm, prop, prompt, None)
    }

    /// Multi-line text, edited in the user's editor.
    pub fn editor(&self, prop: impl Into<String>, prompt: impl Into<Prompt>) -> QuestionBuilder {
        self.builder(QuestionType::Editor, prop, prompt, None)
    }

    pub fn select(
        &self,
        prop: impl Into<String>,
        prompt: impl Into<Prompt>,
        choices: impl Into<ChoiceSource>,
    ) -> QuestionBuilder {
        self.builder(QuestionType::Select, prop, prompt, Some(choices.into()))
    }

    /// Multi-select; `default` values start out checked.
    pub fn checkbox(
        &self,
        prop: impl Into<String>,
        prompt: impl Into<Prompt>,
        choices: impl Into<ChoiceSource>,
    ) -> QuestionBuilder {
        self.builder(QuestionType::Checkbox, prop, prompt, Some(choices.into()))
    }

    pub fn rawlist(
        &self,
        prop: impl Into<String>,
        prompt: impl Into<Prompt>,
        choices: impl Into<ChoiceSource>,
    ) -> QuestionBuilder {
        self.builder(QuestionType::Rawlist, prop, prompt, Some(choices.into()))
    }

    /// Single-select by accelerator key.
    pub fn expand(
        &self,
        prop: impl Into<String>,
        prompt: impl Into<Prompt>,
        choices: impl Into<ChoiceSource>,
    ) -> QuestionBuilder {
        self.builder(QuestionType::Expand, prop, prompt, Some(choices.into()))
    }

    /// Free-form text, or a pick from [`QuestionBuilder::source`] when given.
    pub fn search(&self, prop: impl Into<String>, prompt: impl Into<Prompt>) -> QuestionBuilder {
        self.builder(QuestionType::Search, prop, prompt, None)
    }
}

impl fmt::Debug for Ask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ask")
            .field("requirements", &self.requirements)
            .finish_non_exhaustive()
    }
}

/// Collects the settings of one question until [`build`](Self::build).
#[must_use = "a question builder does nothing until `build` is called"]
pub struct QuestionBuilder {
    renderer: Arc<dyn Renderer>,
    requirements: Requirements,
    question_type: QuestionType,
    prop: String,
    prompt: Prompt,
    choices: Option<ChoiceSource>,
    options: QuestionOptions,
}

impl QuestionBuilder {
    /// Choices for `search`. Replaces the choices of other kinds.
    pub fn source(mut self, choices: impl Into<ChoiceSource>) -> Self {
        self.choices = Some(choices.into());
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.options.default = Some(value.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.options.required = Some(required);
        self
    }

    pub fn ask_answered(mut self, ask_answered: bool) -> Self {
        self.options.ask_answered = Some(ask_answered);
        self
    }

    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&Value, &Answers) -> Result<(), String> + Send + Sync + 'static,
    {
        self.options.validate = Some(Arc::new(validate));
        self
    }

    pub fn filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(Value, &Answers) -> Value + Send + Sync + 'static,
    {
        self.options.filter = Some(Arc::new(filter));
        self
    }

    pub fn when<F>(mut self, when: F) -> Self
    where
        F: Fn(&Answers) -> bool + Send + Sync + 'static,
    {
        self.options.when = Some(Arc::new(when));
        self
    }

    pub fn transformer<F>(mut self, transformer: F) -> Self
    where
        F: Fn(&Value, &Answers, bool) -> String + Send + Sync + 'static,
    {
        self.options.transformer = Some(Arc::new(transformer));
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.options.page_size = Some(page_size);
        self
    }

    pub fn loop_choices(mut self, loop_choices: bool) -> Self {
        self.options.loop_choices = Some(loop_choices);
        self
    }

    pub fn mask(mut self, mask: char) -> Self {
        self.options.mask = Some(mask);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.options.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.options.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.options.step = Some(step);
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.options.expanded = Some(expanded);
        self
    }

    /// Renderer-specific setting, forwarded as is.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.extra.insert(key.into(), value.into());
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: QuestionOptions) -> Self {
        self.options = options;
        self
    }

    /// Normalize the choices and build the question.
    ///
    /// Fails when the key is empty, when a choice-bearing kind ends up without
    /// choices, on ambiguous dictionary choices, and when `expand` choices
    /// share a key.
    pub fn build(self) -> Result<Question, ConfigError> {
        if self.prop.is_empty() {
            return Err(ConfigError::EmptyProp);
        }

        let checked = if self.question_type.is_multi_select() {
            self.options.checked_values()
        } else {
            None
        };
        let choices = match &self.choices {
            Some(source) if self.question_type.has_choices() => normalize(source, checked)?,
            _ => Vec::new(),
        };

        let shape = answer_shape(
            self.question_type,
            &self.prop,
            &choices,
            &self.requirements,
        );
        if shape.is_uninhabited() {
            return Err(ConfigError::NoChoices {
                prop: self.prop,
                question_type: self.question_type,
            });
        }
        if self.question_type == QuestionType::Expand {
            check_expand_keys(&self.prop, &choices)?;
        }

        let resolved = self.requirements.resolve();
        Ok(Question::from_parts(QuestionParts {
            renderer: self.renderer,
            requirements: self.requirements,
            resolved,
            shape,
            question_type: self.question_type,
            prop: self.prop,
            prompt: self.prompt,
            choices,
            options: self.options,
        }))
    }
}

fn check_expand_keys(prop: &str, choices: &[Choice]) -> Result<(), ConfigError> {
    let mut seen = HashSet::from([EXPAND_HELP_KEY]);
    for key in choices.iter().filter_map(|c| c.key) {
        if !seen.insert(key.to_ascii_lowercase()) {
            return Err(ConfigError::DuplicateKey {
                prop: prop.to_string(),
                key,
            });
        }
    }
    Ok(())
}
