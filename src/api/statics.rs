use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::api::client::{self, ApiClient};
use crate::error::{ApiError, ApiResult};
use crate::model::{Project, ProjectDetail, SocialLink};

pub const PROJECTS_ENDPOINT: &str = "/projects-simple.json";
pub const DETAILS_ENDPOINT: &str = "/project-details.json";
pub const SOCIALS_ENDPOINT: &str = "/social-links.json";

pub const LIST_STALE_AFTER: Duration = Duration::from_secs(5 * 60);
pub const DETAILS_STALE_AFTER: Duration = Duration::from_secs(10 * 60);

struct CacheEntry {
    fetched_at: Instant,
    value: serde_json::Value,
}

/// Read-only access to the static JSON documents, with one in-memory cache
/// keyed by endpoint path and a fixed staleness window per document.
pub struct StaticCatalog {
    client: ApiClient,
    cache: Mutex<HashMap<String, CacheEntry>>,
}

impl StaticCatalog {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn projects(&self) -> ApiResult<Vec<Project>> {
        self.fetch_cached(PROJECTS_ENDPOINT, LIST_STALE_AFTER).await
    }

    pub async fn project_details(&self) -> ApiResult<Vec<ProjectDetail>> {
        self.fetch_cached(DETAILS_ENDPOINT, DETAILS_STALE_AFTER).await
    }

    pub async fn project_detail(&self, id: i64) -> ApiResult<ProjectDetail> {
        let details = self.project_details().await?;
        details
            .into_iter()
            .find(|d| d.id == id)
            .ok_or(ApiError::NotFound(id))
    }

    pub async fn social_links(&self) -> ApiResult<Vec<SocialLink>> {
        self.fetch_cached(SOCIALS_ENDPOINT, DETAILS_STALE_AFTER).await
    }

    /// Drops every cached document; the next read refetches.
    pub async fn invalidate(&self) {
        self.cache.lock().await.clear();
    }

    async fn fetch_cached<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        stale_after: Duration,
    ) -> ApiResult<T> {
        {
            let cache = self.cache.lock().await;
            if let Some(entry) = cache.get(endpoint) {
                if entry.fetched_at.elapsed() < stale_after {
                    debug!("cache hit for {}", endpoint);
                    return serde_json::from_value(entry.value.clone())
                        .map_err(|e| ApiError::Parse(e.to_string()));
                }
            }
        }

        // Fetch with the lock released so a slow document cannot stall reads
        // of the others. Concurrent misses on the same endpoint may fetch
        // twice; last insert wins.
        let value: serde_json::Value =
            client::retry(|| self.client.get_json(endpoint)).await?;
        // Validate the schema before caching so a malformed document fails
        // fast on every read instead of poisoning the cache.
        let parsed: T =
            serde_json::from_value(value.clone()).map_err(|e| ApiError::Parse(e.to_string()))?;
        self.cache.lock().await.insert(
            endpoint.to_string(),
            CacheEntry {
                fetched_at: Instant::now(),
                value,
            },
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_projects() -> serde_json::Value {
        serde_json::json!([
            {
                "id": 1,
                "title": "Shop",
                "description": "Storefront",
                "image": "/images/shop.webp",
                "tags": ["react"],
                "branches": ["web"]
            },
            {
                "id": 2,
                "title": "Blog",
                "description": "Writing",
                "tags": ["vue"]
            }
        ])
    }

    async fn catalog_for(server: &MockServer) -> StaticCatalog {
        StaticCatalog::new(ApiClient::new(server.uri()).unwrap())
    }

    #[tokio::test]
    async fn test_projects_parse_with_optional_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PROJECTS_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_projects()))
            .mount(&server)
            .await;

        let catalog = catalog_for(&server).await;
        let projects = catalog.projects().await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].branches, vec!["web"]);
        assert!(projects[1].branches.is_empty());
    }

    #[tokio::test]
    async fn test_second_read_within_window_hits_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PROJECTS_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_projects()))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = catalog_for(&server).await;
        catalog.projects().await.unwrap();
        let second = catalog.projects().await.unwrap();
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PROJECTS_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_projects()))
            .expect(2)
            .mount(&server)
            .await;

        let catalog = catalog_for(&server).await;
        catalog.projects().await.unwrap();
        catalog.invalidate().await;
        catalog.projects().await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_document_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PROJECTS_ENDPOINT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{ "title": "missing id" }])),
            )
            .mount(&server)
            .await;

        let catalog = catalog_for(&server).await;
        assert!(matches!(
            catalog.projects().await,
            Err(ApiError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_cache_hit_is_not_blocked_by_slow_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PROJECTS_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_projects()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(SOCIALS_ENDPOINT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let catalog = std::sync::Arc::new(catalog_for(&server).await);
        catalog.projects().await.unwrap();

        // Kick off the slow document, then read the warmed one while the
        // slow fetch is still in flight.
        let slow = {
            let catalog = std::sync::Arc::clone(&catalog);
            tokio::spawn(async move { catalog.social_links().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        let started = Instant::now();
        let projects = catalog.projects().await.unwrap();
        assert_eq!(projects.len(), 2);
        assert!(
            started.elapsed() < Duration::from_millis(500),
            "warm read waited {:?} behind the slow fetch",
            started.elapsed()
        );

        assert!(slow.await.unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detail_lookup_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DETAILS_ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 1,
                    "title": "Shop",
                    "shortDescription": "Storefront",
                    "fullDescription": "A storefront.",
                    "technologies": ["react"],
                    "features": ["cart"],
                    "status": "Live",
                    "client": "Acme"
                }
            ])))
            .mount(&server)
            .await;

        let catalog = catalog_for(&server).await;
        let detail = catalog.project_detail(1).await.unwrap();
        assert_eq!(detail.short_description, "Storefront");

        assert_eq!(
            catalog.project_detail(7).await.unwrap_err(),
            ApiError::NotFound(7)
        );
    }
}
