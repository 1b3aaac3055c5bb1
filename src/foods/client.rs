use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

/// Error type for USDA FoodData Central lookups.
#[derive(Debug, thiserror::Error)]
pub enum UsdaError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-2xx status.
    #[error("USDA API error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, for the log.
        body: String,
    },
}

/// One entry of a food's nutrient array, keyed by numeric nutrient ID.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    pub nutrient_id: i64,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub unit_name: String,
}

/// A search hit as USDA returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFood {
    pub fdc_id: i64,
    pub description: String,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
    pub serving_size: Option<f64>,
    pub serving_size_unit: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFood>,
}

/// FoodData Central search client.
#[derive(Debug, Clone)]
pub struct UsdaClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl UsdaClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Free-text search over the Foundation and SR Legacy data types,
    /// up to 50 results sorted by data type. Zero hits is an empty list,
    /// not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchFood>, UsdaError> {
        let url = format!("{}/v1/foods/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", query),
                ("dataType", "Foundation,SR Legacy"),
                ("pageSize", "50"),
                ("pageNumber", "1"),
                ("sortBy", "dataType.keyword"),
                ("sortOrder", "asc"),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(UsdaError::Api { status, body });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.foods)
    }
}
