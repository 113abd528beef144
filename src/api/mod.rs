//! Inbound request and outbound response for one scrape.
//!
//! Shapes match the JSON exchanged with the presentation layer:
//!
//! ```text
//! → {"searchTerm": "吹風機", "maxResults": 30}
//! ← {"success": true, "count": 2, "products": [...]}
//! ← {"success": false, "message": "..."}
//! ```

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::app::{AppContext, Result, ShelfscanError};
use crate::domain::ProductRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl ScrapeRequest {
    pub fn new(search_term: &str, max_results: Option<usize>) -> Self {
        Self {
            search_term: search_term.to_string(),
            max_results,
        }
    }

    /// Parse a JSON request body. Malformed bodies are input errors.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| ShelfscanError::InvalidInput(format!("malformed request: {}", e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// HTTP-style status for transport shells; not serialized
    #[serde(skip)]
    pub status: u16,
}

impl ScrapeResponse {
    pub fn success(products: Vec<ProductRecord>) -> Self {
        Self {
            success: true,
            count: Some(products.len()),
            products: Some(products),
            message: None,
            status: 200,
        }
    }

    pub fn failure(err: &ShelfscanError) -> Self {
        Self {
            success: false,
            count: None,
            products: None,
            message: Some(err.to_string()),
            status: if err.is_input_error() { 400 } else { 500 },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Serve one request end to end. Never fails: errors become failure responses.
pub async fn handle(ctx: &AppContext, request: ScrapeRequest) -> ScrapeResponse {
    let max_results = request
        .max_results
        .unwrap_or(ctx.config.source.default_max_results);
    info!(
        "Scrape request received: term='{}' maxResults={}",
        request.search_term, max_results
    );

    match ctx.controller.run(&request.search_term, max_results).await {
        Ok(outcome) => ScrapeResponse::success(outcome.records),
        Err(e) => {
            error!("Scrape failed: {}", e);
            ScrapeResponse::failure(&e)
        }
    }
}

/// Parse a raw JSON body and serve it.
pub async fn handle_json(ctx: &AppContext, body: &str) -> ScrapeResponse {
    match ScrapeRequest::from_json(body) {
        Ok(request) => handle(ctx, request).await,
        Err(e) => ScrapeResponse::failure(&e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{Config, FetchConfig, GatewayConfig, SourceConfig};
    use crate::fetcher::GatewayFetcher;

    #[test]
    fn test_request_defaults() {
        let request = ScrapeRequest::from_json(r#"{"searchTerm": "吹風機"}"#).unwrap();
        assert_eq!(request, ScrapeRequest::new("吹風機", None));

        let request = ScrapeRequest::from_json(r#"{"searchTerm": "x", "maxResults": 50}"#).unwrap();
        assert_eq!(request.max_results, Some(50));
    }

    #[test]
    fn test_malformed_request_is_input_error() {
        let err = ScrapeRequest::from_json(r#"{"searchTerm": "x", "maxResults": -1}"#).unwrap_err();
        assert!(err.is_input_error());
        assert!(ScrapeRequest::from_json("not json").is_err());
    }

    #[test]
    fn test_success_shape() {
        let response = ScrapeResponse::success(Vec::new());
        let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 0);
        assert!(json["products"].as_array().unwrap().is_empty());
        assert!(json.get("message").is_none());
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_failure_shape_and_status() {
        let response = ScrapeResponse::failure(&ShelfscanError::InvalidInput("Missing searchTerm".into()));
        let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid input: Missing searchTerm");
        assert!(json.get("products").is_none());
        assert_eq!(response.status, 400);

        let response = ScrapeResponse::failure(&ShelfscanError::Config("missing key".into()));
        assert_eq!(response.status, 500);
    }

    fn gateway_context(endpoint: &str, api_key: Option<&str>) -> AppContext {
        let mut config = Config::default();
        config.gateway = GatewayConfig {
            endpoint: endpoint.to_string(),
            ..Default::default()
        };
        config.source = SourceConfig {
            page_delay_ms: 0,
            ..Default::default()
        };
        let fetcher = GatewayFetcher::new(
            &FetchConfig::default(),
            &config.gateway,
            api_key.map(String::from),
        )
        .unwrap();
        AppContext::with_fetcher(config, Arc::new(fetcher)).unwrap()
    }

    #[tokio::test]
    async fn test_missing_credential_fails_without_fetching() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let ctx = gateway_context(&format!("{}/v1/", server.url()), None);

        let response = handle(&ctx, ScrapeRequest::new("吹風機", Some(10))).await;

        assert!(!response.success);
        assert_eq!(response.status, 500);
        assert!(response.message.unwrap().starts_with("Configuration error"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_term_fails_before_credential_check() {
        let ctx = gateway_context("http://127.0.0.1:9/v1/", None);
        let response = handle_json(&ctx, r#"{"maxResults": 10}"#).await;

        assert!(!response.success);
        assert_eq!(response.status, 400);
    }

    #[tokio::test]
    async fn test_end_to_end_through_gateway() {
        let mut server = mockito::Server::new_async().await;
        let page = r#"<html><body><div class="listArea"><ul>
            <li><a href="/goods/GoodsDetail.jsp?i_code=5550001"><h3 class="prdName">【ABC】XJ-200 吹風機</h3></a>
                <p class="price"><span class="money">$1,290</span></p></li>
            <li><a href="/goods/GoodsDetail.jsp?i_code=5550002"><h3 class="prdName">洽詢商品</h3></a>
                <p class="price"><span class="money">洽詢</span></p></li>
        </ul></div></body></html>"#;
        let mock = server
            .mock("GET", "/v1/")
            .match_query(mockito::Matcher::UrlEncoded("apikey".into(), "k3y".into()))
            .with_status(200)
            .with_body(page)
            .expect(1)
            .create_async()
            .await;
        let ctx = gateway_context(&format!("{}/v1/", server.url()), Some("k3y"));

        let response = handle_json(&ctx, r#"{"searchTerm": "吹風機", "maxResults": 10}"#).await;

        assert!(response.success);
        assert_eq!(response.count, Some(1));
        let products = response.products.unwrap();
        assert_eq!(products[0].product_id, "5550001");
        assert_eq!(products[0].brand_name, "ABC");
        assert_eq!(products[0].product_model, "XJ-200");
        assert_eq!(products[0].price, 1290);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_first_page_transport_error_is_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/")
            .match_query(mockito::Matcher::Any)
            .with_status(502)
            .create_async()
            .await;
        let ctx = gateway_context(&format!("{}/v1/", server.url()), Some("k3y"));

        let response = handle(&ctx, ScrapeRequest::new("吹風機", None)).await;

        assert!(!response.success);
        assert!(response.message.unwrap().starts_with("HTTP error"));
    }
}
