//! Sequencing questions and transform steps into a survey.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

use crate::{
    Answers, ConfigError, FieldShape, Question, RecordShape, Requirements, Resolved, SurveyError,
    ValueShape,
};

/// What a step expects from the running answers and what it adds to them.
#[derive(Debug, Clone, PartialEq)]
pub struct StepContract {
    pub requires: Resolved,
    pub produces: RecordShape,
}

/// One step of a survey: takes the running answers, returns the new ones.
#[async_trait]
pub trait SurveyStep: Send + Sync {
    async fn run(&self, answers: Answers) -> Result<Answers, SurveyError>;

    fn contract(&self) -> StepContract;
}

#[async_trait]
impl SurveyStep for Question {
    async fn run(&self, answers: Answers) -> Result<Answers, SurveyError> {
        self.ask(Some(answers)).await
    }

    fn contract(&self) -> StepContract {
        // a `when` hook may skip the question and leave its key unset
        let produced = self.answer_shape().produced.clone();
        let field = if self.options().when.is_some() {
            FieldShape::optional(produced)
        } else {
            FieldShape::required(produced)
        };
        StepContract {
            requires: self.resolved().clone(),
            produces: RecordShape::empty().with_field(self.prop(), field),
        }
    }
}

type StepFn = dyn Fn(Answers) -> BoxFuture<'static, Result<Answers, SurveyError>> + Send + Sync;

/// A plain async function over the running answers.
///
/// A transform declares nothing by default; use [`produces`](Self::produces)
/// and [`requires`](Self::requires) to make its keys visible to [`Survey::infer`].
#[derive(Clone)]
pub struct Transform {
    f: Arc<StepFn>,
    requires: Resolved,
    produces: RecordShape,
}

impl Transform {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Answers) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Answers, SurveyError>> + Send + 'static,
    {
        Self {
            f: Arc::new(move |answers| f(answers).boxed()),
            requires: Resolved::none(),
            produces: RecordShape::empty(),
        }
    }

    /// Declare a key this transform always sets.
    pub fn produces(mut self, key: impl Into<String>, shape: ValueShape) -> Self {
        self.produces = self.produces.with_field(key, FieldShape::required(shape));
        self
    }

    /// Declare what this transform reads from the running answers.
    pub fn requires(mut self, requirements: impl Into<Requirements>) -> Self {
        self.requires = requirements.into().resolve();
        self
    }
}

#[async_trait]
impl SurveyStep for Transform {
    async fn run(&self, answers: Answers) -> Result<Answers, SurveyError> {
        (self.f)(answers).await
    }

    fn contract(&self) -> StepContract {
        StepContract {
            requires: self.requires.clone(),
            produces: self.produces.clone(),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("requires", &self.requires)
            .field("produces", &self.produces)
            .finish_non_exhaustive()
    }
}

/// An ordered list of steps run one after another over a shared answer record.
///
/// A survey holds no run state: [`start`](Self::start) can be called any
/// number of times, also concurrently, and every run gets its own answers.
#[derive(Clone, Default)]
pub struct Survey {
    steps: Vec<Arc<dyn SurveyStep>>,
}

impl Survey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn step(mut self, step: impl SurveyStep + 'static) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    /// Append a plain async function as a step.
    pub fn then<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Answers) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Answers, SurveyError>> + Send + 'static,
    {
        self.step(Transform::new(f))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, starting from `initial` (or no answers).
    ///
    /// Stops at the first failing step and returns its error unchanged.
    pub async fn start(&self, initial: Option<Answers>) -> Result<Answers, SurveyError> {
        let mut answers = initial.unwrap_or_default();
        for (index, step) in self.steps.iter().enumerate() {
            debug!(step = index, "running survey step");
            answers = step.run(answers).await?;
            debug!(step = index, answered = answers.len(), "survey step finished");
        }
        Ok(answers)
    }

    /// Fold the step contracts into the shape of the final answers.
    ///
    /// `initial` describes the answers the survey will be started with. Fails
    /// on the first step (0-based) with a mandatory requirement that neither
    /// `initial` nor an earlier step guarantees, or that they provide with an
    /// incompatible shape.
    pub fn infer(&self, initial: &RecordShape) -> Result<RecordShape, ConfigError> {
        let mut shape = initial.clone();
        for (index, step) in self.steps.iter().enumerate() {
            let StepContract { requires, produces } = step.contract();

            for (key, field) in requires.shape.fields() {
                match shape.get(key) {
                    Some(provided) if !field.optional && provided.optional => {
                        return Err(ConfigError::UnsatisfiedRequirement {
                            step: index,
                            key: key.to_string(),
                        });
                    }
                    Some(provided) => {
                        // optional requirements also accept an explicit null
                        let expected = if field.optional {
                            ValueShape::union([field.shape.clone(), ValueShape::Null])
                        } else {
                            field.shape.clone()
                        };
                        if !provided.shape.is_within(&expected) {
                            return Err(ConfigError::RequirementTypeMismatch {
                                step: index,
                                key: key.to_string(),
                                expected: field.shape.to_string(),
                                actual: provided.shape.to_string(),
                            });
                        }
                    }
                    None if !field.optional => {
                        return Err(ConfigError::UnsatisfiedRequirement {
                            step: index,
                            key: key.to_string(),
                        });
                    }
                    None => shape = shape.with_field(key, field.clone()),
                }
            }

            shape = shape.merge(&produces).with_open(true);
        }
        Ok(shape)
    }
}

impl fmt::Debug for Survey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Survey")
            .field("steps", &self.steps.len())
            .finish()
    }
}

/// Build a [`Survey`] from a list of steps.
///
/// ```rust,ignore
/// let profile = survey![name, age, smoke];
/// ```
#[macro_export]
macro_rules! survey {
    ($($step:expr),* $(,)?) => {
        $crate::Survey::new()$(.step($step))*
    };
}
