use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const RETRY_ATTEMPTS: u32 = 3;
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Uniform wire envelope returned by the JSON API. Missing optional fields
/// deserialize as `None` without requiring `T: Default`.
#[derive(Deserialize, Debug)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
}

/// Thin reqwest wrapper: fixed timeout, JSON bodies, typed failures.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// GET a plain JSON document (no envelope), e.g. the static catalogue files.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        debug!("GET {}", endpoint);
        let resp = self.send(self.http.get(self.url(endpoint))).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        debug!("GET {}", endpoint);
        let resp = self.send(self.http.get(self.url(endpoint))).await?;
        read_enveloped(resp).await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> ApiResult<T> {
        debug!("GET {} ({} params)", endpoint, query.len());
        let resp = self
            .send(self.http.get(self.url(endpoint)).query(query))
            .await?;
        read_enveloped(resp).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> ApiResult<T> {
        debug!("POST {}", endpoint);
        let resp = self.send(self.http.post(self.url(endpoint)).json(body)).await?;
        read_enveloped(resp).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> ApiResult<T> {
        debug!("PUT {}", endpoint);
        let resp = self.send(self.http.put(self.url(endpoint)).json(body)).await?;
        read_enveloped(resp).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
    ) -> ApiResult<T> {
        debug!("PATCH {}", endpoint);
        let resp = self
            .send(self.http.patch(self.url(endpoint)).json(body))
            .await?;
        read_enveloped(resp).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        debug!("DELETE {}", endpoint);
        let resp = self.send(self.http.delete(self.url(endpoint))).await?;
        read_enveloped(resp).await
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let resp = req.send().await.map_err(map_transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }
        Ok(resp)
    }
}

fn map_transport(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(e.to_string())
    }
}

async fn read_enveloped<T: DeserializeOwned>(resp: reqwest::Response) -> ApiResult<T> {
    let envelope: Envelope<T> = resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))?;
    if !envelope.success {
        let msg = envelope
            .error
            .or(envelope.message)
            .unwrap_or_else(|| "Unknown error occurred".to_string());
        return Err(ApiError::Rejected(msg));
    }
    envelope
        .data
        .ok_or_else(|| ApiError::Parse("envelope is missing the data field".to_string()))
}

/// Fixed-count retry with linear backoff, applied uniformly to failed reads.
pub async fn retry<T, F, Fut>(mut op: F) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut last = ApiError::Network("no attempts made".to_string());
    for attempt in 1..=RETRY_ATTEMPTS {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!("attempt {}/{} failed: {}", attempt, RETRY_ATTEMPTS, e);
                last = e;
                if attempt < RETRY_ATTEMPTS {
                    tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                }
            }
        }
    }
    Err(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Deserialize, Debug, PartialEq)]
    struct Item {
        id: i64,
        title: String,
    }

    // Item has no Default impl on purpose: the envelope must deserialize
    // for payload types that only implement Deserialize.
    #[test]
    fn test_envelope_tolerates_missing_optional_fields() {
        let envelope: Envelope<Item> = serde_json::from_str(r#"{ "success": true }"#).unwrap();
        assert!(envelope.success);
        assert!(envelope.data.is_none());
        assert!(envelope.error.is_none());
        assert!(envelope.message.is_none());
    }

    #[tokio::test]
    async fn test_get_json_parses_plain_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects-simple.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([
                    { "id": 1, "title": "Shop" }
                ])),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let items: Vec<Item> = client.get_json("/projects-simple.json").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Shop");
    }

    #[tokio::test]
    async fn test_http_error_status_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects-simple.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let result: ApiResult<Vec<Item>> = client.get_json("/projects-simple.json").await;
        assert_eq!(
            result.unwrap_err(),
            ApiError::Http {
                status: 500,
                message: "Internal Server Error".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects-simple.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let result: ApiResult<Vec<Item>> = client.get_json("/projects-simple.json").await;
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[tokio::test]
    async fn test_envelope_success_unwraps_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": { "id": 1, "title": "Shop" }
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let item: Item = client.get("/projects/1").await.unwrap();
        assert_eq!(item.id, 1);
    }

    #[tokio::test]
    async fn test_envelope_failure_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "error": "Project with ID 9 not found"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let result: ApiResult<Item> = client.get("/projects/9").await;
        assert_eq!(
            result.unwrap_err(),
            ApiError::Rejected("Project with ID 9 not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_retry_recovers_after_transient_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects-simple.json"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/projects-simple.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let items: Vec<Item> = retry(|| client.get_json("/projects-simple.json"))
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_retry_surfaces_last_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects-simple.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let result: ApiResult<Vec<Item>> =
            retry(|| client.get_json("/projects-simple.json")).await;
        assert!(matches!(result, Err(ApiError::Http { status: 503, .. })));
    }
}
