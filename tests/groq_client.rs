//! Chat-completion client tests against a mock upstream, plus the
//! end-to-end generate-then-parse path.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use calofree::mealgen::dto::{MacroFocus, MealPreferences};
use calofree::mealgen::parse::parse_generated_meal;
use calofree::mealgen::prompt::build_prompt;
use calofree::mealgen::{GroqClient, GroqError};

const REPLY: &str = "Here is your meal. I hope you enjoy it.\n\n\
    Lentil Power Bowl,\n\
    Servings Per Recipe: 2,\n\
    Serving Amount: 400 grams\n\
    Calories per Serving: 610 kcal\n\
    Protein per Serving: 34\n\
    Carbs per Serving: 78\n\
    Fats per Serving: 18\n\n\
    Ingredients: 1 cup lentils (200g), 2 carrots (120g),\n\n\
    Instructions: Simmer the lentils. Roast the carrots. Serve together.";

fn completion_payload(content: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": { "role": "assistant", "content": content }
        }]
    })
}

#[tokio::test]
async fn complete_sends_model_and_sampling_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "llama-3.1-8b-instant",
            "max_tokens": 7999,
            "temperature": 1.2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_payload("hello")))
        .expect(1)
        .mount(&server)
        .await;

    let client = GroqClient::new(server.uri(), "test-key", "llama-3.1-8b-instant");
    let content = client.complete("say hello").await.expect("completion ok");
    assert_eq!(content, "hello");
}

#[tokio::test]
async fn generated_reply_parses_into_a_meal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_payload(REPLY)))
        .mount(&server)
        .await;

    let prefs = MealPreferences {
        diet: "Vegetarian".into(),
        max_calories: 700,
        food_preferences: "lentils".into(),
        foods_to_avoid: "meat".into(),
        macro_focus: MacroFocus::Protein,
        max_budget: 10,
    };

    let client = GroqClient::new(server.uri(), "test-key", "llama-3.1-8b-instant");
    let content = client.complete(&build_prompt(&prefs)).await.unwrap();
    let meal = parse_generated_meal(&content).expect("reply should parse");

    assert_eq!(meal.name, "Lentil Power Bowl");
    assert_eq!(meal.calories, 610.0);
    assert_eq!(meal.protein, 34.0);
    assert_eq!(meal.carbs, 78.0);
    assert_eq!(meal.fat, 18.0);
}

#[tokio::test]
async fn upstream_failure_is_a_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = GroqClient::new(server.uri(), "test-key", "llama-3.1-8b-instant");
    let err = client.complete("prompt").await.unwrap_err();
    match err {
        GroqError::Api { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("rate limited"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_choices_is_missing_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = GroqClient::new(server.uri(), "test-key", "llama-3.1-8b-instant");
    let err = client.complete("prompt").await.unwrap_err();
    assert!(matches!(err, GroqError::MissingContent));
}
