//! Core types for the ask-survey crates.
//!
//! This crate holds everything that does not touch a terminal:
//! - [`normalize`] and the [`ChoiceSource`] family - turning any choice notation into [`Choice`]s
//! - [`RequirementDescriptor`] and [`resolve`] - what a question expects from prior answers
//! - [`answer_shape`] and [`ValueShape`] / [`RecordShape`] - what a question contributes
//! - [`Answers`] - the running answer record
//! - [`Renderer`] and [`RenderConfig`] - the seam to the prompt-rendering backend

mod error;
pub use error::{ConfigError, SurveyError};

mod question_type;
pub use question_type::QuestionType;

mod answers;
pub use answers::{AnswerError, Answers};

mod shape;
pub use shape::{FieldShape, RecordShape, ShapeViolation, ValueShape, value_type_name};

mod choice;
pub use choice::{
    Choice, ChoiceDict, ChoiceElement, ChoiceProxy, ChoiceSource, DictValue, Disabled,
    choice_values, display_name, normalize,
};

mod requirement;
pub use requirement::{
    Requirement, RequirementDescriptor, Requirements, Resolved, TokenError, TypeToken, resolve,
};

mod infer;
pub use infer::{AnswerShape, ArgumentMode, answer_shape};

mod options;
pub use options::{Condition, Filter, QuestionOptions, Transformer, Validator};

mod render;
pub use render::{RenderConfig, Renderer};
