use ask_survey::{Ask, ConfigError, Question};
use serde_json::json;

pub fn favorite_color(ask: &Ask) -> Result<Question, ConfigError> {
    ask.select("color", "Pick a color", ["red", "blue", "green"])
        .build()
}

/// Numbers with descriptions, from `[value, description]` pairs.
pub fn favorite_numbers(ask: &Ask) -> Result<Question, ConfigError> {
    ask.checkbox(
        "numbers",
        "Which numbers do you like?",
        json!({
            "One": [1, "just a single one"],
            "Two": [2, "a duo of two"],
            "Three": [3, "a trio"],
        }),
    )
    .default(json!([2]))
    .build()
}
