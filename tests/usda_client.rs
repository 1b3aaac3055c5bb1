//! USDA FoodData Central client tests against a mock upstream.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use calofree::foods::dto::FoodSummary;
use calofree::foods::{UsdaClient, UsdaError};

fn banana_payload() -> serde_json::Value {
    json!({
        "totalHits": 1,
        "foods": [{
            "fdcId": 1_102_653,
            "description": "Bananas, ripe and slightly ripe, raw",
            "dataType": "Foundation",
            "foodNutrients": [
                { "nutrientId": 2047, "nutrientName": "Energy (Atwater General Factors)", "value": 98.0, "unitName": "KCAL" },
                { "nutrientId": 1003, "nutrientName": "Protein", "value": 0.74, "unitName": "G" },
                { "nutrientId": 1004, "nutrientName": "Total lipid (fat)", "value": 0.29, "unitName": "G" },
                { "nutrientId": 1005, "nutrientName": "Carbohydrate, by difference", "value": 23.0, "unitName": "G" }
            ]
        }]
    })
}

#[tokio::test]
async fn search_sends_the_fixed_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/foods/search"))
        .and(query_param("query", "banana"))
        .and(query_param("dataType", "Foundation,SR Legacy"))
        .and(query_param("pageSize", "50"))
        .and(query_param("pageNumber", "1"))
        .and(query_param("sortBy", "dataType.keyword"))
        .and(query_param("sortOrder", "asc"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(banana_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let client = UsdaClient::new(server.uri(), "test-key");
    let foods = client.search("banana").await.expect("search should succeed");
    assert_eq!(foods.len(), 1);
    assert_eq!(foods[0].description, "Bananas, ripe and slightly ripe, raw");
}

#[tokio::test]
async fn search_results_flatten_into_macro_summaries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/foods/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(banana_payload()))
        .mount(&server)
        .await;

    let client = UsdaClient::new(server.uri(), "test-key");
    let foods = client.search("banana").await.unwrap();
    let summary = FoodSummary::from(foods.into_iter().next().unwrap());

    assert_eq!(summary.fdc_id, 1_102_653);
    assert_eq!(summary.calories, 98.0);
    assert_eq!(summary.protein, 0.74);
    assert_eq!(summary.fat, 0.29);
    assert_eq!(summary.carbs, 23.0);
    // No declared serving size means per-100g reference values.
    assert!(summary.serving_size.is_none());
}

#[tokio::test]
async fn zero_hits_is_an_empty_list_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/foods/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalHits": 0, "foods": [] })))
        .mount(&server)
        .await;

    let client = UsdaClient::new(server.uri(), "test-key");
    let foods = client.search("xyzzy").await.expect("empty result is ok");
    assert!(foods.is_empty());
}

#[tokio::test]
async fn missing_foods_key_reads_as_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/foods/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalHits": 0 })))
        .mount(&server)
        .await;

    let client = UsdaClient::new(server.uri(), "test-key");
    let foods = client.search("xyzzy").await.unwrap();
    assert!(foods.is_empty());
}

#[tokio::test]
async fn upstream_failure_is_a_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/foods/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = UsdaClient::new(server.uri(), "test-key");
    let err = client.search("banana").await.unwrap_err();
    match err {
        UsdaError::Api { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("upstream exploded"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
