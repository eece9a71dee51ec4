pub mod client;
pub mod remote;
pub mod statics;
pub mod store;

use std::sync::Arc;

use log::info;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::ApiResult;
use crate::model::{CreateProject, Page, ProjectQuery, StoredProject, UpdateProject};

use client::ApiClient;
use remote::RemoteProjectsApi;
use store::{ProjectStore, StoreStats};

enum Backend {
    Mock(Arc<Mutex<ProjectStore>>),
    Remote(RemoteProjectsApi),
}

/// CRUD surface for project entries, backed either by the mock store or a
/// real JSON API. The choice is made once at startup.
pub struct ProjectsApi {
    backend: Backend,
}

impl ProjectsApi {
    /// Probes `{base}/health` and uses the real backend when it responds.
    /// `use_real_api` only changes the log line; an unreachable backend
    /// always falls back to the mock store.
    pub async fn select(config: &Config, store: Arc<Mutex<ProjectStore>>, client: ApiClient) -> Self {
        let remote = RemoteProjectsApi::new(client);
        let healthy = remote.check_health().await;
        if config.use_real_api {
            info!(
                "real API forced: {}",
                if healthy { "connected" } else { "failed to connect, using mock" }
            );
        } else {
            info!(
                "auto-detected {} API for projects",
                if healthy { "real" } else { "mock" }
            );
        }
        let backend = if healthy {
            Backend::Remote(remote)
        } else {
            Backend::Mock(store)
        };
        Self { backend }
    }

    pub fn mock(store: Arc<Mutex<ProjectStore>>) -> Self {
        Self {
            backend: Backend::Mock(store),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.backend, Backend::Remote(_))
    }

    pub fn backend_label(&self) -> &'static str {
        if self.is_remote() {
            "live api"
        } else {
            "mock api"
        }
    }

    pub async fn list(&self, query: &ProjectQuery) -> ApiResult<Page<StoredProject>> {
        match &self.backend {
            Backend::Mock(store) => store.lock().await.list(query).await,
            Backend::Remote(remote) => remote.list(query).await,
        }
    }

    pub async fn get(&self, id: i64) -> ApiResult<StoredProject> {
        match &self.backend {
            Backend::Mock(store) => store.lock().await.get(id).await,
            Backend::Remote(remote) => remote.get(id).await,
        }
    }

    pub async fn create(&self, payload: CreateProject) -> ApiResult<StoredProject> {
        match &self.backend {
            Backend::Mock(store) => store.lock().await.create(payload).await,
            Backend::Remote(remote) => remote.create(&payload).await,
        }
    }

    pub async fn update(&self, id: i64, patch: UpdateProject) -> ApiResult<StoredProject> {
        match &self.backend {
            Backend::Mock(store) => store.lock().await.update(id, patch).await,
            Backend::Remote(remote) => remote.update(id, &patch).await,
        }
    }

    pub async fn delete(&self, id: i64) -> ApiResult<i64> {
        match &self.backend {
            Backend::Mock(store) => store.lock().await.delete(id).await,
            Backend::Remote(remote) => remote.delete(id).await,
        }
    }

    /// Mock-only provenance counts; a remote backend reports none.
    pub async fn stats(&self) -> Option<StoreStats> {
        match &self.backend {
            Backend::Mock(store) => Some(store.lock().await.stats()),
            Backend::Remote(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, ProjectStatus};
    use std::time::Duration;

    fn mock_api(dir: &std::path::Path) -> ProjectsApi {
        let mut store = ProjectStore::new(dir.join("custom_projects.json"), Duration::ZERO);
        store.seed(&[Project {
            id: 1,
            title: "Shop".into(),
            description: "Storefront".into(),
            image: String::new(),
            tags: vec!["react".into()],
            branches: vec![],
        }]);
        ProjectsApi::mock(Arc::new(Mutex::new(store)))
    }

    #[tokio::test]
    async fn test_mock_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let api = mock_api(dir.path());
        assert!(!api.is_remote());
        assert_eq!(api.backend_label(), "mock api");

        let created = api
            .create(CreateProject {
                title: "CLI tool".into(),
                description: "desc".into(),
                status: ProjectStatus::Planning,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(api.get(created.id).await.unwrap().title, "CLI tool");

        let page = api.list(&ProjectQuery::default()).await.unwrap();
        assert_eq!(page.total, 2);

        api.delete(created.id).await.unwrap();
        let stats = api.stats().await.unwrap();
        assert_eq!(stats.custom, 0);
    }
}
