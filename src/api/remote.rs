use serde::Deserialize;

use crate::api::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::model::{CreateProject, Page, ProjectQuery, StoredProject, UpdateProject};

#[derive(Deserialize)]
struct DeleteAck {
    id: i64,
}

/// Real JSON API backend, used when a backend is reachable at the base URL.
pub struct RemoteProjectsApi {
    client: ApiClient,
}

impl RemoteProjectsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn check_health(&self) -> bool {
        self.client.get::<serde_json::Value>("/health").await.is_ok()
    }

    pub async fn list(&self, query: &ProjectQuery) -> ApiResult<Page<StoredProject>> {
        self.client.get_with("/projects", &query_params(query)).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<StoredProject> {
        self.client
            .get(&format!("/projects/{}", id))
            .await
            .map_err(|e| map_not_found(e, id))
    }

    pub async fn create(&self, payload: &CreateProject) -> ApiResult<StoredProject> {
        self.client.post("/projects", payload).await
    }

    pub async fn update(&self, id: i64, patch: &UpdateProject) -> ApiResult<StoredProject> {
        self.client
            .patch(&format!("/projects/{}", id), patch)
            .await
            .map_err(|e| map_not_found(e, id))
    }

    pub async fn delete(&self, id: i64) -> ApiResult<i64> {
        let ack: DeleteAck = self
            .client
            .delete(&format!("/projects/{}", id))
            .await
            .map_err(|e| map_not_found(e, id))?;
        Ok(ack.id)
    }
}

fn map_not_found(e: ApiError, id: i64) -> ApiError {
    match e {
        ApiError::Http { status: 404, .. } => ApiError::NotFound(id),
        other => other,
    }
}

fn query_params(query: &ProjectQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("page".to_string(), query.page.to_string()),
        ("limit".to_string(), query.limit.to_string()),
        ("sortBy".to_string(), query.sort_key.as_str().to_string()),
        ("sortOrder".to_string(), query.sort_order.as_str().to_string()),
    ];
    if let Some(search) = &query.search {
        params.push(("search".to_string(), search.clone()));
    }
    if let Some(status) = query.status {
        params.push(("status".to_string(), status.as_str().to_string()));
    }
    for tag in &query.tags {
        params.push(("tags".to_string(), tag.clone()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProjectStatus;
    use wiremock::matchers::{body_json_string, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn wire_project(id: i64, title: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "description": "desc",
            "tags": ["rust"],
            "technologies": ["rust"],
            "status": "completed",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-02T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_list_sends_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(query_param("search", "shop"))
            .and(query_param("sortBy", "updatedAt"))
            .and(query_param("sortOrder", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": {
                    "items": [wire_project(1, "Shop")],
                    "total": 1, "page": 1, "limit": 10,
                    "has_next": false, "has_prev": false
                }
            })))
            .mount(&server)
            .await;

        let api = RemoteProjectsApi::new(ApiClient::new(server.uri()).unwrap());
        let page = api
            .list(&ProjectQuery {
                search: Some("shop".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Shop");
    }

    #[tokio::test]
    async fn test_get_maps_404_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/42"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let api = RemoteProjectsApi::new(ApiClient::new(server.uri()).unwrap());
        assert_eq!(api.get(42).await.unwrap_err(), ApiError::NotFound(42));
    }

    #[tokio::test]
    async fn test_create_posts_payload() {
        let server = MockServer::start().await;
        let payload = CreateProject {
            title: "Shop".into(),
            description: "desc".into(),
            tags: vec!["rust".into()],
            status: ProjectStatus::Planning,
            ..Default::default()
        };
        Mock::given(method("POST"))
            .and(path("/projects"))
            .and(body_json_string(serde_json::to_string(&payload).unwrap()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": wire_project(1000, "Shop")
            })))
            .mount(&server)
            .await;

        let api = RemoteProjectsApi::new(ApiClient::new(server.uri()).unwrap());
        let created = api.create(&payload).await.unwrap();
        assert_eq!(created.id, 1000);
    }

    #[tokio::test]
    async fn test_delete_returns_acknowledged_id() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/projects/1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": { "id": 1000 }
            })))
            .mount(&server)
            .await;

        let api = RemoteProjectsApi::new(ApiClient::new(server.uri()).unwrap());
        assert_eq!(api.delete(1000).await.unwrap(), 1000);
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": { "status": "ok" }
            })))
            .mount(&server)
            .await;

        let api = RemoteProjectsApi::new(ApiClient::new(server.uri()).unwrap());
        assert!(api.check_health().await);

        let down = RemoteProjectsApi::new(ApiClient::new("http://127.0.0.1:9").unwrap());
        assert!(!down.check_health().await);
    }
}
