//! Integration tests for ask-survey

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ask_survey::{
    Answers, Ask, ChoiceDict, ConfigError, FieldShape, Prompt, QuestionType, RecordShape,
    RequirementDescriptor, Survey, SurveyError, TestRenderer, Transform, TypeToken, ValueShape,
    survey,
};
use serde::Deserialize;
use serde_json::json;

#[tokio::test]
async fn select_answers_first_choice() {
    let ask = Ask::new(TestRenderer::new());
    let color = ask
        .select("color", "pick", ["red", "blue", "green"])
        .build()
        .unwrap();

    let answers = color.ask(None).await.unwrap();
    assert_eq!(answers, Answers::new().with("color", "red"));
}

#[tokio::test]
async fn checkbox_default_is_checked_before_rendering() {
    let renderer = TestRenderer::new();
    let ask = Ask::new(renderer.clone());
    let apparel = ask
        .checkbox(
            "apparel",
            "What do you wear?",
            ChoiceDict::new().entry("Hats", "hats").entry("Shoes", "shoes"),
        )
        .default(json!(["shoes"]))
        .build()
        .unwrap();

    let shoes = &apparel.choices()[1];
    assert_eq!(shoes.name, "Shoes");
    assert_eq!(shoes.checked, Some(true));
    assert_eq!(apparel.choices()[0].checked, None);

    let answers = apparel.ask(None).await.unwrap();
    assert_eq!(answers.get("apparel"), Some(&json!(["shoes"])));
    assert_eq!(renderer.calls()[0].choices, apparel.choices());
}

#[tokio::test]
async fn survey_with_mock_answers() {
    let ask = Ask::new(TestRenderer::new());
    let name = ask.input("name", "What is your name?").build().unwrap();
    let smoke = ask
        .confirm("smoke", "Do you smoke?")
        .default(false)
        .build()
        .unwrap();

    let answers = survey![name, smoke].start(None).await.unwrap();
    assert_eq!(
        answers.into_value(),
        json!({ "name": "Mock Answer", "smoke": false })
    );
}

#[tokio::test]
async fn requirements_flow_into_dynamic_prompts() {
    let renderer = TestRenderer::new().with_response("name", "Alice");
    let ask = Ask::new(renderer.clone());

    let name = ask.input("name", "What is your name?").build().unwrap();
    let greeting = ask
        .with_requirements(RequirementDescriptor::new().require("name", TypeToken::String))
        .input(
            "hobby",
            Prompt::dynamic(|answers: &Answers| {
                format!("What do you do for fun, {}?", answers.get_string("name").unwrap_or("stranger"))
            }),
        )
        .build()
        .unwrap();
    assert!(greeting.requires_answers());

    let answers = survey![name, greeting].start(None).await.unwrap();
    assert_eq!(answers.get_string("hobby").unwrap(), "Mock Answer");

    let calls = renderer.calls();
    assert_eq!(calls[1].message, "What do you do for fun, Alice?");
}

#[tokio::test]
async fn initial_state_satisfies_requirements_without_prompting() {
    let renderer = TestRenderer::new();
    let smoke = Ask::new(renderer.clone())
        .with_requirements(RequirementDescriptor::new().require("age", TypeToken::Number))
        .confirm("smoke", "Do you smoke?")
        .default(false)
        .build()
        .unwrap();

    let answers = Survey::new()
        .step(smoke)
        .start(Some(Answers::new().with("age", 65)))
        .await
        .unwrap();

    assert_eq!(answers.into_value(), json!({ "age": 65, "smoke": false }));
    let asked: Vec<_> = renderer.calls().into_iter().map(|c| c.name).collect();
    assert_eq!(asked, vec!["smoke"]);
}

#[tokio::test]
async fn unmet_requirements_fail_before_rendering() {
    let renderer = TestRenderer::new();
    let smoke = Ask::new(renderer.clone())
        .with_requirements(
            RequirementDescriptor::parse([("age", "number"), ("title?", "string(Mr,Mrs,Ms)")])
                .unwrap(),
        )
        .confirm("smoke", "Do you smoke?")
        .build()
        .unwrap();

    assert!(matches!(
        smoke.ask(None).await,
        Err(SurveyError::MissingAnswers { prop }) if prop == "smoke"
    ));
    assert!(matches!(
        smoke.ask(Some(Answers::new().with("title", "Mr"))).await,
        Err(SurveyError::UnmetRequirement { key, .. }) if key == "age"
    ));
    assert!(matches!(
        smoke.ask(Some(Answers::new().with("age", 65).with("title", "Sir"))).await,
        Err(SurveyError::RequirementMismatch { key, .. }) if key == "title"
    ));
    assert!(renderer.calls().is_empty());

    let answers = smoke
        .ask(Some(Answers::new().with("age", 65).with("title", "Ms")))
        .await
        .unwrap();
    assert_eq!(answers.get_bool("smoke").unwrap(), false);
}

#[tokio::test]
async fn last_write_wins() {
    let survey = Survey::new()
        .then(|answers: Answers| async move { Ok::<_, SurveyError>(answers.with("x", 1)) })
        .then(|answers: Answers| async move { Ok::<_, SurveyError>(answers.with("x", 2)) });

    let answers = survey.start(None).await.unwrap();
    assert_eq!(answers.into_value(), json!({ "x": 2 }));
}

#[tokio::test]
async fn answering_the_same_key_again_overwrites() {
    let renderer = TestRenderer::new().with_response("name", "Carol");
    let name = Ask::new(renderer).input("name", "Name?").build().unwrap();

    let answers = name
        .ask(Some(Answers::new().with("name", "Alice").with("age", 3)))
        .await
        .unwrap();
    assert_eq!(answers.into_value(), json!({ "name": "Carol", "age": 3 }));
}

#[tokio::test]
async fn first_failure_stops_the_survey() {
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&ran);

    let ask = Ask::new(TestRenderer::new().rejecting("age"));
    let survey = survey![
        ask.input("name", "Name?").build().unwrap(),
        ask.number("age", "Age?").build().unwrap(),
        Transform::new(move |answers: Answers| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, SurveyError>(answers)
            }
        }),
    ];

    let err = survey.start(None).await.unwrap_err();
    assert_eq!(err.to_string(), "Rejected question 'age'");
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn transform_errors_propagate_unchanged() {
    let survey = Survey::new().then(|_: Answers| async { Err::<Answers, _>(SurveyError::Cancelled) });
    assert!(survey.start(None).await.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn runs_are_independent() {
    let renderer = TestRenderer::new();
    let ask = Ask::new(renderer.clone());
    let survey = survey![
        ask.input("name", "Name?").build().unwrap(),
        ask.number("age", "Age?").build().unwrap(),
    ];

    let runs = futures::future::join_all([
        survey.start(None),
        survey.start(Some(Answers::new().with("id", 1))),
        survey.start(Some(Answers::new().with("id", 2))),
    ])
    .await;

    let ids: Vec<_> = runs
        .into_iter()
        .map(|run| run.unwrap().get("id").cloned())
        .collect();
    assert_eq!(ids, vec![None, Some(json!(1)), Some(json!(2))]);
    assert_eq!(renderer.calls().len(), 6);
}

#[tokio::test]
async fn dynamic_prompt_is_evaluated_per_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let renderer = TestRenderer::new();
    let question = Ask::new(renderer.clone())
        .input(
            "name",
            Prompt::dynamic(move |_: &Answers| {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                format!("Attempt {n}")
            }),
        )
        .build()
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    question.ask(None).await.unwrap();
    question.ask(None).await.unwrap();

    let messages: Vec<_> = renderer.calls().into_iter().map(|c| c.message).collect();
    assert_eq!(messages, vec!["Attempt 1", "Attempt 2"]);
}

#[tokio::test]
async fn skipped_question_leaves_answers_untouched() {
    let ask = Ask::new(TestRenderer::new());
    let pet = ask
        .input("pet", "Pet name?")
        .when(|answers: &Answers| answers.get_bool("has_pet").unwrap_or(false))
        .build()
        .unwrap();

    let answers = pet.ask(Some(Answers::new().with("has_pet", false))).await.unwrap();
    assert_eq!(answers.into_value(), json!({ "has_pet": false }));
}

#[test]
fn answer_shapes_are_inferred_per_kind() {
    let ask = Ask::new(TestRenderer::new());

    let numbers = ask
        .checkbox("numbers", "?", json!({ "One": [1, "one"], "Two": [2, "two"] }))
        .build()
        .unwrap();
    assert_eq!(numbers.answer_shape().produced.to_string(), "(1 | 2)[]");

    let action = ask
        .expand("action", "?", json!({ "Overwrite": "overwrite", "Abort": "abort" }))
        .build()
        .unwrap();
    assert_eq!(
        action.answer_shape().record.to_string(),
        r#"{ action: "overwrite" | "abort"; [key: string]: unknown }"#
    );

    let pick = ask.search("pick", "?").source(["a", "b"]).build().unwrap();
    assert_eq!(pick.answer_shape().produced.to_string(), r#""a" | "b""#);
    assert_eq!(pick.question_type(), QuestionType::Search);
}

#[test]
fn survey_shape_is_folded_over_steps() {
    let ask = Ask::new(TestRenderer::new());
    let needs_age = ask.with_requirements(RequirementDescriptor::new().require("age", TypeToken::Number));

    let name = ask.input("name", "Name?").build().unwrap();
    let age = ask.number("age", "Age?").build().unwrap();
    let smoke = needs_age.confirm("smoke", "Smoke?").build().unwrap();

    let ordered = survey![name.clone(), age.clone(), smoke.clone()];
    let shape = ordered.infer(&RecordShape::empty()).unwrap();
    assert_eq!(
        shape.to_string(),
        "{ name: string; age: number; smoke: boolean; [key: string]: unknown }"
    );

    let misordered = survey![name, smoke.clone(), age];
    assert_eq!(
        misordered.infer(&RecordShape::empty()),
        Err(ConfigError::UnsatisfiedRequirement {
            step: 1,
            key: "age".to_string()
        })
    );

    let seeded = RecordShape::empty().with_field("age", FieldShape::required(ValueShape::Number));
    assert!(survey![smoke].infer(&seeded).is_ok());
}

#[test]
fn survey_shape_rejects_incompatible_providers() {
    let ask = Ask::new(TestRenderer::new());
    let needs_age = ask.with_requirements(RequirementDescriptor::new().require("age", TypeToken::Number));
    let smoke = needs_age.confirm("smoke", "Smoke?").build().unwrap();

    let typed_age = ask.input("age", "Age?").build().unwrap();
    assert_eq!(
        survey![typed_age, smoke.clone()].infer(&RecordShape::empty()),
        Err(ConfigError::RequirementTypeMismatch {
            step: 1,
            key: "age".to_string(),
            expected: "number".to_string(),
            actual: "string".to_string(),
        })
    );

    let picked_age = ask.select("age", "Age?", [18, 30, 65]).build().unwrap();
    assert!(survey![picked_age, smoke].infer(&RecordShape::empty()).is_ok());

    let needs_title = ask.with_requirements(
        RequirementDescriptor::new().require("title", TypeToken::StringEnum(vec!["Mr".into(), "Ms".into()])),
    );
    let free_title = ask.input("title", "Title?").build().unwrap();
    let greeting = needs_title.input("greeting", "Greeting?").build().unwrap();
    assert!(matches!(
        survey![free_title, greeting].infer(&RecordShape::empty()),
        Err(ConfigError::RequirementTypeMismatch { step: 1, .. })
    ));
}

#[tokio::test]
async fn conditional_questions_do_not_guarantee_their_key() {
    let ask = Ask::new(TestRenderer::new());
    let age = ask
        .number("age", "Age?")
        .when(|answers: &Answers| answers.get_bool("adult").unwrap_or(false))
        .build()
        .unwrap();
    let smoke = ask
        .with_requirements(RequirementDescriptor::new().require("age", TypeToken::Number))
        .confirm("smoke", "Smoke?")
        .build()
        .unwrap();

    let survey = survey![age.clone(), smoke];
    assert_eq!(
        survey.infer(&RecordShape::empty()),
        Err(ConfigError::UnsatisfiedRequirement {
            step: 1,
            key: "age".to_string()
        })
    );
    assert!(matches!(
        survey.start(None).await,
        Err(SurveyError::UnmetRequirement { key, .. }) if key == "age"
    ));

    let shape = survey![age].infer(&RecordShape::empty()).unwrap();
    assert_eq!(shape.to_string(), "{ age?: number; [key: string]: unknown }");
}

#[test]
fn transforms_can_declare_their_output() {
    let ask = Ask::new(TestRenderer::new());
    let smoke = ask
        .with_requirements(RequirementDescriptor::new().require("age", TypeToken::Number))
        .confirm("smoke", "Smoke?")
        .build()
        .unwrap();

    let survey = Survey::new()
        .step(
            Transform::new(|answers: Answers| async move { Ok::<_, SurveyError>(answers.with("age", 42)) })
                .produces("age", ValueShape::Number),
        )
        .step(smoke);
    assert!(survey.infer(&RecordShape::empty()).is_ok());
}

#[tokio::test]
async fn answers_deserialize_into_a_typed_record() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Profile {
        name: String,
        age: u32,
        smoke: bool,
    }

    let ask = Ask::new(TestRenderer::new().with_response("name", "Bob"));
    let profile = survey![
        ask.input("name", "Name?").build().unwrap(),
        ask.number("age", "Age?").build().unwrap(),
        ask.confirm("smoke", "Smoke?").build().unwrap(),
    ]
    .start(None)
    .await
    .unwrap()
    .into_record::<Profile>()
    .unwrap();

    assert_eq!(
        profile,
        Profile {
            name: "Bob".to_string(),
            age: 30,
            smoke: false,
        }
    );
}
