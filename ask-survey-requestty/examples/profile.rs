//! Profile survey - name, age and smoking habit
//!
//! Demonstrates:
//! - Text input with a default
//! - Numeric bounds (min/max)
//! - A question that requires an earlier answer
//! - Deserializing the answers into a typed record
//!
//! Run with: RUST_LOG=debug cargo run -p ask-survey-requestty --example profile

use ask_survey::Ask;
use ask_survey_requestty::RequesttyRenderer;
use example_surveys::{Profile, apparel, profile_survey};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let ask = Ask::new(RequesttyRenderer::new());

    let answers = profile_survey(&ask)?
        .step(apparel(&ask)?)
        .start(None)
        .await?;

    println!("{:#}", answers.clone().into_value());

    let profile: Profile = answers.into_record()?;
    println!("{profile:#?}");
    Ok(())
}
