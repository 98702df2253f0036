//! Expand prompt with fixed accelerator keys
//!
//! Run with: cargo run -p ask-survey-requestty --example file_action

use ask_survey::Ask;
use ask_survey_requestty::RequesttyRenderer;
use example_surveys::file_action;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let ask = Ask::new(RequesttyRenderer::new());
    let answers = file_action(&ask, "foobar.txt")?.ask(None).await?;
    println!("{}", answers.into_value());
    Ok(())
}
