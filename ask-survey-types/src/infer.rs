//! What a question contributes to the running answer record.

use crate::requirement::{Requirements, Resolved};
use crate::shape::{FieldShape, RecordShape, ValueShape};
use crate::{Choice, QuestionType};

impl QuestionType {
    /// Shape of the value this kind of question produces over `choices`.
    ///
    /// Choice-bearing kinds with no choices produce [`ValueShape::Never`];
    /// `search` without choices is free-form text.
    pub fn produces(&self, choices: &[Choice]) -> ValueShape {
        let picked = || ValueShape::union(choices.iter().map(|c| ValueShape::literal(c.value.clone())));

        match self {
            Self::Input | Self::Editor | Self::Password => ValueShape::String,
            Self::Number => ValueShape::Number,
            Self::Confirm => ValueShape::Boolean,
            Self::Select | Self::Rawlist | Self::Expand => picked(),
            Self::Checkbox => match picked() {
                ValueShape::Never => ValueShape::Never,
                element => ValueShape::list(element),
            },
            Self::Search if choices.is_empty() => ValueShape::String,
            Self::Search => picked(),
        }
    }
}

/// Whether invoking a question needs prior answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentMode {
    Optional,
    Required,
}

/// The inferred contract of one question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerShape {
    /// Requirement shape merged with `{ prop: produced }`, open for unknown keys.
    pub record: RecordShape,

    /// Shape of the value stored under the question's key.
    pub produced: ValueShape,

    pub argument: ArgumentMode,
}

impl AnswerShape {
    /// No value can satisfy the question, so it can never be answered.
    pub fn is_uninhabited(&self) -> bool {
        self.produced.is_never()
    }
}

/// Infer the shape a question of `question_type` adds under `prop`.
pub fn answer_shape(
    question_type: QuestionType,
    prop: &str,
    choices: &[Choice],
    requirements: &Requirements,
) -> AnswerShape {
    let Resolved { shape, mandatory } = requirements.resolve();
    let produced = question_type.produces(choices);
    let record = shape.merge(
        &RecordShape::empty().with_field(prop, FieldShape::required(produced.clone())),
    );

    AnswerShape {
        record,
        produced,
        argument: if mandatory {
            ArgumentMode::Required
        } else {
            ArgumentMode::Optional
        },
    }
}
