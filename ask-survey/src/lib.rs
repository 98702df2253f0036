//! # ask-survey
//!
//! Typed builder for interactive CLI surveys. Renderer-agnostic.
//!
//! Questions are built from a root [`Ask`] factory, which normalizes their
//! choices and infers the shape of the answer each one contributes. Questions
//! and plain async steps compose into a [`Survey`] that threads one answer
//! record through every step in order.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ask_survey::{Ask, RequirementDescriptor, TypeToken, survey};
//!
//! let ask = Ask::new(renderer);
//!
//! let name = ask.input("name", "What is your name?").default("Bob").build()?;
//! let age = ask.number("age", "How old are you?").min(1.0).max(150.0).build()?;
//! let smoke = ask
//!     .with_requirements(RequirementDescriptor::new().require("age", TypeToken::Number))
//!     .confirm("smoke", "Do you smoke?")
//!     .default(false)
//!     .build()?;
//!
//! let answers = survey![name, age, smoke].start(None).await?;
//! ```
//!
//! ## Renderers
//!
//! Renderers are separate crates that implement [`Renderer`]:
//! - `ask-survey-requestty` - CLI prompts via requestty
//!
//! [`TestRenderer`] answers without a terminal, for tests.

// Re-export all types from ask-survey-types
pub use ask_survey_types::*;

mod ask;
pub use ask::{Ask, QuestionBuilder, ask};

mod question;
pub use question::{Prompt, Question};

mod survey;
pub use survey::{StepContract, Survey, SurveyStep, Transform};

// Test renderer for asking questions without user interaction
mod test_renderer;
pub use test_renderer::{MOCK_NUMBER, MOCK_TEXT, RenderedQuestion, TestRenderer, TestRendererError};
