use ask_survey::{Ask, ChoiceDict, ChoiceProxy, ConfigError, Question};
use serde_json::json;

/// Clothes, with shoes and hats pre-checked and slinkeys out of stock.
pub fn apparel(ask: &Ask) -> Result<Question, ConfigError> {
    let choices = ChoiceDict::new()
        .entry("Hats", "hats")
        .entry("Shoes", "shoes")
        .proxy(
            "Slinkeys",
            ChoiceProxy::new("slinkeys").with_disabled_reason("none in stock"),
        )
        .entry("Shirts", "shirts")
        .entry("Sweaters", "sweaters");

    ask.checkbox(
        "apparel",
        "What type of clothes are you interested in?",
        choices,
    )
    .default(json!(["shoes", "hats"]))
    .build()
}

pub fn secret(ask: &Ask) -> Result<Question, ConfigError> {
    ask.password("secret", "Ssh; what's your secret?")
        .default("i-have-no-secrets")
        .mask('*')
        .required(true)
        .build()
}
