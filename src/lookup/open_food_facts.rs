//! Open Food Facts client

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{LookupError, ProductSource};
use crate::nutrition::{energy_like_keys, normalize, NutritionRecord};

const USER_AGENT: &str = concat!("kcal/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Fields requested from the search endpoint
pub const SEARCH_FIELDS: &str =
    "code,product_name,product_name_en,brands,nutriments,quantity,serving_size";

/// HTTP client for the Open Food Facts API
pub struct OpenFoodFacts {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenFoodFacts {
    pub fn new(base_url: &str) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn product_url(&self, code: &str) -> String {
        format!("{}/api/v0/product/{}.json", self.base_url, code)
    }

    pub fn search_url(&self) -> String {
        format!("{}/cgi/search.pl", self.base_url)
    }

    /// GET a JSON body; `None` on a non-success status
    async fn get_json(&self, request: reqwest::RequestBuilder) -> Result<Option<Value>, LookupError> {
        let response = request
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Product database returned non-success");
            return Ok(None);
        }

        response
            .json::<Value>()
            .await
            .map(Some)
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ProductSource for OpenFoodFacts {
    async fn by_barcode(&self, code: &str) -> Result<Option<NutritionRecord>, LookupError> {
        let url = self.product_url(code);
        tracing::debug!(code = %code, url = %url, "Looking up product");

        let body = self.get_json(self.http_client.get(&url)).await?;
        Ok(body.as_ref().and_then(parse_product_response))
    }

    async fn search(&self, term: &str, limit: u32) -> Result<Vec<NutritionRecord>, LookupError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let page_size = limit.to_string();
        let request = self.http_client.get(self.search_url()).query(&[
            ("search_terms", term),
            ("json", "1"),
            ("page_size", page_size.as_str()),
            ("action", "process"),
            ("fields", SEARCH_FIELDS),
        ]);
        tracing::debug!(term = %term, limit, "Searching products");

        let body = self.get_json(request).await?;
        Ok(body.as_ref().map(parse_search_response).unwrap_or_default())
    }
}

/// Parse a barcode lookup body
///
/// `status == 0` or a missing `product` means the code is unknown.
pub fn parse_product_response(body: &Value) -> Option<NutritionRecord> {
    if body.get("status").and_then(Value::as_i64) == Some(0) {
        return None;
    }
    let product = body.get("product")?;
    let record = normalize(product)?;

    if record.kcal_per_100 == 0.0 {
        tracing::warn!(
            product = %record.name,
            energy_keys = ?energy_like_keys(product),
            "Product resolved to 0 kcal"
        );
    }
    Some(record)
}

/// Parse a search body into normalized records, skipping non-objects
pub fn parse_search_response(body: &Value) -> Vec<NutritionRecord> {
    body.get("products")
        .and_then(Value::as_array)
        .map(|products| products.iter().filter_map(normalize).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_urls() {
        let client = OpenFoodFacts::new("https://world.openfoodfacts.org/").unwrap();
        assert_eq!(
            client.product_url("4006381333931"),
            "https://world.openfoodfacts.org/api/v0/product/4006381333931.json"
        );
        assert_eq!(client.search_url(), "https://world.openfoodfacts.org/cgi/search.pl");
    }

    #[test]
    fn test_product_response_found() {
        let body = json!({
            "status": 1,
            "product": {
                "product_name": "Oat flakes",
                "brands": "Kölln",
                "nutriments": { "energy-kcal_100g": 372, "proteins_100g": 13.5 }
            }
        });
        let record = parse_product_response(&body).unwrap();
        assert_eq!(record.name, "Oat flakes");
        assert_eq!(record.kcal_per_100, 372.0);
    }

    #[test]
    fn test_product_response_unknown_code() {
        let body = json!({ "status": 0, "status_verbose": "product not found" });
        assert_eq!(parse_product_response(&body), None);
        assert_eq!(parse_product_response(&json!({ "status": 1 })), None);
        assert_eq!(parse_product_response(&json!({ "status": 1, "product": null })), None);
    }

    #[test]
    fn test_zero_kcal_product_is_still_returned() {
        let body = json!({ "status": 1, "product": { "product_name": "Water" } });
        let record = parse_product_response(&body).unwrap();
        assert_eq!(record.kcal_per_100, 0.0);
    }

    #[test]
    fn test_search_response() {
        let body = json!({
            "count": 3,
            "products": [
                { "product_name": "Skyr", "nutriments": { "energy_100g": 264 } },
                null,
                { "product_name_en": "Greek yogurt" }
            ]
        });
        let records = parse_search_response(&body);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kcal_per_100, 63.0);
        assert_eq!(records[1].name, "Greek yogurt");
        assert!(parse_search_response(&json!({})).is_empty());
    }
}
