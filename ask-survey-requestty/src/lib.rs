//! Requestty renderer for ask-survey.
//!
//! This crate provides a command-line interface for answering ask-survey
//! questions using the `requestty` library.
//!
//! # Example
//!
//! ```ignore
//! use ask_survey::{Ask, survey};
//! use ask_survey_requestty::RequesttyRenderer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ask = Ask::new(RequesttyRenderer::new());
//!     let name = ask.input("name", "What is your name?").build()?;
//!     let age = ask.number("age", "How old are you?").build()?;
//!
//!     let answers = survey![name, age].start(None).await?;
//!     println!("Hello, {} ({} years old)!", answers.get_string("name")?, answers.get_int("age")?);
//!     Ok(())
//! }
//! ```

mod backend;

pub use backend::RequesttyError;
pub use backend::RequesttyRenderer;
