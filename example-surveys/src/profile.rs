use ask_survey::{Ask, ConfigError, Question, RequirementDescriptor, Survey, TypeToken, survey};
use serde::Deserialize;

/// The answers of [`profile_survey`], typed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub smoke: bool,
}

/// "What is your name?", defaulting to Bob.
pub fn name(ask: &Ask) -> Result<Question, ConfigError> {
    ask.input("name", "What is your name?")
        .default("Bob")
        .required(true)
        .build()
}

/// Age between 1 and 150.
pub fn age(ask: &Ask) -> Result<Question, ConfigError> {
    ask.number("age", "How old are you?")
        .min(1.0)
        .max(150.0)
        .default(42)
        .build()
}

/// Needs the age in its prior answers.
pub fn smoke(ask: &Ask) -> Result<Question, ConfigError> {
    ask.with_requirements(RequirementDescriptor::new().require("age", TypeToken::Number))
        .confirm("smoke", "Do you smoke?")
        .default(false)
        .build()
}

/// Name, age and smoking habit, asked in that order.
pub fn profile_survey(ask: &Ask) -> Result<Survey, ConfigError> {
    Ok(survey![name(ask)?, age(ask)?, smoke(ask)?])
}
