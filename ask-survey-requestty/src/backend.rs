//! Requestty implementation of the Renderer trait.

use ask_survey::{
    Answers, Choice, QuestionOptions, QuestionType, RenderConfig, Renderer, SurveyError,
    display_name,
};
use async_trait::async_trait;
use serde_json::{Number, Value};
use thiserror::Error;
use tracing::debug;

/// Key requestty reserves on `expand` prompts for showing all choices.
const EXPAND_HELP_KEY: char = 'h';

/// Smallest page size requestty accepts for list prompts.
const MIN_PAGE_SIZE: usize = 5;

/// Error type for the Requestty renderer.
#[derive(Debug, Error)]
pub enum RequesttyError {
    /// User cancelled the survey (e.g., pressed Ctrl+C).
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An error occurred during prompting.
    #[error("Prompt error: {0}")]
    PromptError(String),

    /// Unexpected answer type received.
    #[error("Unexpected answer type: expected {expected}, got {got}")]
    UnexpectedAnswerType { expected: String, got: String },

    /// The prompt thread panicked or was cancelled.
    #[error("Prompt task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<requestty::ErrorKind> for RequesttyError {
    fn from(err: requestty::ErrorKind) -> Self {
        match err {
            requestty::ErrorKind::Interrupted => Self::Cancelled,
            _ => Self::PromptError(err.to_string()),
        }
    }
}

impl From<RequesttyError> for SurveyError {
    fn from(err: RequesttyError) -> Self {
        match err {
            RequesttyError::Cancelled => Self::Cancelled,
            other => Self::render(other),
        }
    }
}

/// Requestty renderer for interactive CLI prompts.
///
/// Prompts block the calling thread, so each one runs on tokio's blocking pool.
#[derive(Debug, Default, Clone)]
pub struct RequesttyRenderer;

impl RequesttyRenderer {
    /// Create a new Requestty renderer.
    pub const fn new() -> Self {
        Self
    }

    /// Ask one question. `None` means it was skipped.
    fn prompt(config: &RenderConfig) -> Result<Option<Value>, RequesttyError> {
        let options = &config.options;
        if !options.is_enabled(&config.answers) {
            debug!(name = %config.name, "question disabled by `when`");
            return Ok(None);
        }
        if options.ask_answered == Some(false) && config.answers.contains(&config.name) {
            debug!(name = %config.name, "question already answered");
            return Ok(None);
        }

        let value = match config.question_type {
            QuestionType::Input => ask_input(config)?,
            QuestionType::Search if config.choices.is_empty() => ask_input(config)?,
            QuestionType::Editor => ask_editor(config)?,
            QuestionType::Password => ask_password(config)?,
            QuestionType::Number => ask_number(config)?,
            QuestionType::Confirm => ask_confirm(config)?,
            QuestionType::Select | QuestionType::Search => ask_select(config)?,
            QuestionType::Rawlist => ask_rawlist(config)?,
            QuestionType::Expand => ask_expand(config)?,
            QuestionType::Checkbox => ask_checkbox(config)?,
        };

        Ok(Some(options.apply_filter(value, &config.answers)))
    }
}

#[async_trait]
impl Renderer for RequesttyRenderer {
    async fn render(&self, config: RenderConfig) -> Result<Answers, SurveyError> {
        let name = config.name.clone();
        let answer = tokio::task::spawn_blocking(move || Self::prompt(&config))
            .await
            .map_err(RequesttyError::from)??;

        Ok(match answer {
            Some(value) => Answers::new().with(name, value),
            None => Answers::new(),
        })
    }
}

fn unexpected(expected: &str, got: requestty::Answer) -> RequesttyError {
    RequesttyError::UnexpectedAnswerType {
        expected: expected.to_string(),
        got: format!("{got:?}"),
    }
}

fn default_text(options: &QuestionOptions) -> Option<String> {
    options.default.as_ref().map(display_name)
}

fn ask_input(config: &RenderConfig) -> Result<Value, RequesttyError> {
    let options = &config.options;
    let mut q = requestty::Question::input(config.name.as_str()).message(config.message.as_str());

    if let Some(default) = default_text(options) {
        q = q.default(default);
    }

    let validate_fn = |value: &str, _: &requestty::Answers| -> Result<(), String> {
        if options.required == Some(true) && value.trim().is_empty() {
            return Err("An answer is required".to_string());
        }
        options.check(&Value::from(value), &config.answers)
    };

    match requestty::prompt_one(q.validate(validate_fn).build())? {
        requestty::Answer::String(s) => Ok(Value::String(s)),
        other => Err(unexpected("String", other)),
    }
}

fn ask_editor(config: &RenderConfig) -> Result<Value, RequesttyError> {
    let options = &config.options;
    let mut q = requestty::Question::editor(config.name.as_str()).message(config.message.as_str());

    if let Some(default) = default_text(options) {
        q = q.default(default);
    }

    let validate_fn = |value: &str, _: &requestty::Answers| -> Result<(), String> {
        options.check(&Value::from(value), &config.answers)
    };

    match requestty::prompt_one(q.validate(validate_fn).build())? {
        requestty::Answer::String(s) => Ok(Value::String(s)),
        other => Err(unexpected("String", other)),
    }
}

fn ask_password(config: &RenderConfig) -> Result<Value, RequesttyError> {
    // requestty password prompts take no default
    let options = &config.options;
    let mut q =
        requestty::Question::password(config.name.as_str()).message(config.message.as_str());

    if let Some(mask) = options.mask {
        q = q.mask(mask);
    }

    let validate_fn = |value: &str, _: &requestty::Answers| -> Result<(), String> {
        if options.required == Some(true) && value.is_empty() {
            return Err("An answer is required".to_string());
        }
        options.check(&Value::from(value), &config.answers)
    };

    match requestty::prompt_one(q.validate(validate_fn).build())? {
        requestty::Answer::String(s) => Ok(Value::String(s)),
        other => Err(unexpected("String", other)),
    }
}

fn ask_number(config: &RenderConfig) -> Result<Value, RequesttyError> {
    let options = &config.options;
    let mut q = requestty::Question::float(config.name.as_str()).message(config.message.as_str());

    if let Some(default) = options.default.as_ref().and_then(Value::as_f64) {
        q = q.default(default);
    }

    let validate_fn = |value: f64, _: &requestty::Answers| -> Result<(), String> {
        finite(value)?;
        if let Some(min) = options.min
            && value < min
        {
            return Err(format!("Value must be at least {min}"));
        }
        if let Some(max) = options.max
            && value > max
        {
            return Err(format!("Value must be at most {max}"));
        }
        options.check(&number_value(value), &config.answers)
    };

    match requestty::prompt_one(q.validate(validate_fn).build())? {
        requestty::Answer::Float(f) => Ok(number_value(f)),
        other => Err(unexpected("Float", other)),
    }
}

/// `NaN` and infinities have no JSON representation.
fn finite(value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err("Please enter a finite number".to_string())
    }
}

/// Integral floats become integers, so `42.0` is stored as `42`.
fn number_value(f: f64) -> Value {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Value::from(f as i64)
    } else {
        Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

fn ask_confirm(config: &RenderConfig) -> Result<Value, RequesttyError> {
    let mut q = requestty::Question::confirm(config.name.as_str()).message(config.message.as_str());

    if let Some(default) = config.options.default.as_ref().and_then(Value::as_bool) {
        q = q.default(default);
    }

    match requestty::prompt_one(q.build())? {
        requestty::Answer::Bool(b) => Ok(Value::Bool(b)),
        other => Err(unexpected("Bool", other)),
    }
}

/// Label shown for a choice; disabled choices carry their reason.
fn choice_label(choice: &Choice) -> String {
    match &choice.disabled {
        Some(disabled) if disabled.is_disabled() => match disabled.reason() {
            Some(reason) => format!("{} ({reason})", choice.name),
            None => format!("{} (disabled)", choice.name),
        },
        _ => choice.name.clone(),
    }
}

fn default_index(config: &RenderConfig) -> Option<usize> {
    let default = config.options.default.as_ref()?;
    config.choices.iter().position(|c| &c.value == default)
}

/// Look up a picked choice. Disabled picks print a notice and yield `None`.
fn enabled_choice(config: &RenderConfig, index: usize) -> Result<Option<&Choice>, RequesttyError> {
    let choice = config
        .choices
        .get(index)
        .ok_or_else(|| RequesttyError::PromptError(format!("No choice at index {index}")))?;
    if choice.is_disabled() {
        eprintln!("'{}' cannot be selected", choice.name);
        return Ok(None);
    }
    Ok(Some(choice))
}

fn ask_select(config: &RenderConfig) -> Result<Value, RequesttyError> {
    let options = &config.options;
    loop {
        let labels: Vec<String> = config.choices.iter().map(choice_label).collect();
        let mut q = requestty::Question::select(config.name.as_str())
            .message(config.message.as_str())
            .choices(labels);

        if let Some(index) = default_index(config) {
            q = q.default(index);
        }
        if let Some(page_size) = options.page_size {
            q = q.page_size(page_size.max(MIN_PAGE_SIZE));
        }
        if let Some(should_loop) = options.loop_choices {
            q = q.should_loop(should_loop);
        }

        let index = match requestty::prompt_one(q.build())? {
            requestty::Answer::ListItem(item) => item.index,
            other => return Err(unexpected("ListItem", other)),
        };

        let Some(choice) = enabled_choice(config, index)? else {
            continue;
        };
        if let Err(msg) = options.check(&choice.value, &config.answers) {
            eprintln!("Error: {msg}");
            continue;
        }
        break Ok(choice.value.clone());
    }
}

fn ask_rawlist(config: &RenderConfig) -> Result<Value, RequesttyError> {
    let options = &config.options;
    loop {
        let labels: Vec<String> = config.choices.iter().map(choice_label).collect();
        let mut q = requestty::Question::raw_select(config.name.as_str())
            .message(config.message.as_str())
            .choices(labels);

        if let Some(index) = default_index(config) {
            q = q.default(index);
        }
        if let Some(page_size) = options.page_size {
            q = q.page_size(page_size.max(MIN_PAGE_SIZE));
        }
        if let Some(should_loop) = options.loop_choices {
            q = q.should_loop(should_loop);
        }

        let index = match requestty::prompt_one(q.build())? {
            requestty::Answer::ListItem(item) => item.index,
            other => return Err(unexpected("ListItem", other)),
        };

        let Some(choice) = enabled_choice(config, index)? else {
            continue;
        };
        if let Err(msg) = options.check(&choice.value, &config.answers) {
            eprintln!("Error: {msg}");
            continue;
        }
        break Ok(choice.value.clone());
    }
}

/// Accelerator keys for `expand` choices, in choice order.
///
/// Explicit keys win; the rest get the first unused letter or digit of their
/// name, then the first unused letter of the alphabet. The help key is never
/// handed out.
pub(crate) fn expand_keys(choices: &[Choice]) -> Vec<char> {
    let mut used: Vec<char> = vec![EXPAND_HELP_KEY];
    used.extend(choices.iter().filter_map(|c| c.key.map(|k| k.to_ascii_lowercase())));

    choices
        .iter()
        .map(|choice| {
            if let Some(key) = choice.key {
                return key.to_ascii_lowercase();
            }
            let key = choice
                .name
                .chars()
                .map(|c| c.to_ascii_lowercase())
                .filter(char::is_ascii_alphanumeric)
                .chain('a'..='z')
                .find(|c| !used.contains(c))
                .unwrap_or('?');
            used.push(key);
            key
        })
        .collect()
}

fn ask_expand(config: &RenderConfig) -> Result<Value, RequesttyError> {
    let options = &config.options;
    let keys = expand_keys(&config.choices);
    loop {
        let items: Vec<(char, String)> = keys
            .iter()
            .copied()
            .zip(config.choices.iter().map(choice_label))
            .collect();
        let mut q = requestty::Question::expand(config.name.as_str())
            .message(config.message.as_str())
            .choices(items);

        if let Some(index) = default_index(config) {
            q = q.default(keys[index]);
        }

        let key = match requestty::prompt_one(q.build())? {
            requestty::Answer::ExpandItem(item) => item.key,
            other => return Err(unexpected("ExpandItem", other)),
        };
        let index = keys
            .iter()
            .position(|k| *k == key)
            .ok_or_else(|| RequesttyError::PromptError(format!("Unknown key '{key}'")))?;

        let Some(choice) = enabled_choice(config, index)? else {
            continue;
        };
        if let Err(msg) = options.check(&choice.value, &config.answers) {
            eprintln!("Error: {msg}");
            continue;
        }
        break Ok(choice.value.clone());
    }
}

/// The values of the picked choices, in choice order.
fn picked_values(choices: &[Choice], picked: &[bool]) -> Value {
    Value::Array(
        choices
            .iter()
            .zip(picked)
            .filter(|(_, picked)| **picked)
            .map(|(choice, _)| choice.value.clone())
            .collect(),
    )
}

fn ask_checkbox(config: &RenderConfig) -> Result<Value, RequesttyError> {
    let options = &config.options;
    loop {
        let items: Vec<(String, bool)> = config
            .choices
            .iter()
            .map(|c| (choice_label(c), c.is_checked()))
            .collect();
        let mut q = requestty::Question::multi_select(config.name.as_str())
            .message(config.message.as_str())
            .choices_with_default(items);

        if let Some(page_size) = options.page_size {
            q = q.page_size(page_size.max(MIN_PAGE_SIZE));
        }
        if let Some(should_loop) = options.loop_choices {
            q = q.should_loop(should_loop);
        }

        let validate_fn = |picked: &[bool], _: &requestty::Answers| -> Result<(), String> {
            options.check(&picked_values(&config.choices, picked), &config.answers)
        };

        let indices: Vec<usize> = match requestty::prompt_one(q.validate(validate_fn).build())? {
            requestty::Answer::ListItems(items) => items.iter().map(|item| item.index).collect(),
            other => return Err(unexpected("ListItems", other)),
        };

        let mut picked = vec![false; config.choices.len()];
        let mut rejected = false;
        for index in indices {
            if enabled_choice(config, index)?.is_none() {
                rejected = true;
            } else if let Some(slot) = picked.get_mut(index) {
                *slot = true;
            }
        }
        if rejected {
            continue;
        }
        break Ok(picked_values(&config.choices, &picked));
    }
}
