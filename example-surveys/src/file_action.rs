use ask_survey::{Ask, ChoiceDict, ChoiceProxy, ConfigError, Question};

/// Conflict resolution with fixed accelerator keys.
pub fn file_action(ask: &Ask, file: &str) -> Result<Question, ConfigError> {
    let choices = ChoiceDict::new()
        .proxy("Overwrite", ChoiceProxy::new("overwrite").with_key('y'))
        .proxy(
            "Overwrite this one and all next",
            ChoiceProxy::new("overwrite_all").with_key('a'),
        )
        .proxy("Show diff", ChoiceProxy::new("diff").with_key('d'))
        .proxy("Abort", ChoiceProxy::new("abort").with_key('x'));

    ask.expand("action", format!("Conflict on {file}"), choices)
        .build()
}
