use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use log::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::model::{
    CreateProject, Page, Project, ProjectQuery, Provenance, SortKey, SortOrder, StoredProject,
    UpdateProject,
};

/// Custom entries are allocated ids from here upward; kept for compatibility
/// with previously persisted data even though provenance is now an explicit
/// field.
pub const CUSTOM_ID_START: i64 = 1000;

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreStats {
    pub total: usize,
    pub seed: usize,
    pub custom: usize,
}

/// In-memory project list seeded from the static catalogue plus locally
/// persisted custom entries. Only the custom subset is ever written back.
pub struct ProjectStore {
    projects: Vec<StoredProject>,
    next_id: i64,
    storage_path: PathBuf,
    latency: Duration,
}

impl ProjectStore {
    pub fn new(storage_path: PathBuf, latency: Duration) -> Self {
        let custom = load_custom(&storage_path);
        let mut store = Self {
            projects: custom,
            next_id: CUSTOM_ID_START,
            storage_path,
            latency,
        };
        store.recompute_next_id();
        store
    }

    /// Installs the seed entries in front of any loaded custom entries.
    /// Calling again replaces the previous seed set.
    pub fn seed(&mut self, summaries: &[Project]) {
        let now = Utc::now();
        let mut seeded: Vec<StoredProject> = summaries
            .iter()
            .enumerate()
            .map(|(index, p)| StoredProject {
                id: p.id,
                provenance: Provenance::Seed,
                title: p.title.clone(),
                description: p.description.clone(),
                image: p.image.clone(),
                tags: p.tags.clone(),
                technologies: p.tags.clone(),
                github: None,
                demo: None,
                status: Default::default(),
                // Staggered timestamps keep the default updated_at ordering
                // identical to the catalogue order.
                created_at: now - chrono::Duration::days(index as i64),
                updated_at: now - chrono::Duration::hours(12 * index as i64),
            })
            .collect();
        self.projects.retain(|p| p.provenance == Provenance::Custom);
        seeded.append(&mut self.projects);
        self.projects = seeded;
        self.recompute_next_id();
        info!("store seeded with {} projects", summaries.len());
    }

    fn recompute_next_id(&mut self) {
        let max_id = self.projects.iter().map(|p| p.id).max().unwrap_or(0);
        self.next_id = (max_id + 1).max(CUSTOM_ID_START);
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub async fn list(&self, query: &ProjectQuery) -> ApiResult<Page<StoredProject>> {
        self.simulate_latency().await;

        let mut filtered: Vec<&StoredProject> = self
            .projects
            .iter()
            .filter(|p| matches_query(p, query))
            .collect();

        filtered.sort_by(|a, b| {
            let ordering = match query.sort_key {
                SortKey::Title => a.title.cmp(&b.title),
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
            };
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = filtered.len();
        let page = query.page.max(1);
        let start = (page - 1) * query.limit;
        let end = (start + query.limit).min(total);
        let items: Vec<StoredProject> = if start < total {
            filtered[start..end].iter().map(|p| (*p).clone()).collect()
        } else {
            Vec::new()
        };

        Ok(Page {
            items,
            total,
            page,
            limit: query.limit,
            has_next: end < total,
            has_prev: page > 1,
        })
    }

    pub async fn get(&self, id: i64) -> ApiResult<StoredProject> {
        self.simulate_latency().await;
        self.projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ApiError::NotFound(id))
    }

    pub async fn create(&mut self, payload: CreateProject) -> ApiResult<StoredProject> {
        self.simulate_latency().await;
        let now = Utc::now();
        let project = StoredProject {
            id: self.next_id,
            provenance: Provenance::Custom,
            title: payload.title,
            description: payload.description,
            image: payload.image,
            tags: payload.tags,
            technologies: payload.technologies,
            github: payload.github,
            demo: payload.demo,
            status: payload.status,
            created_at: now,
            updated_at: now,
        };
        self.next_id += 1;
        self.projects.push(project.clone());
        self.persist()?;
        info!("created project {} ({:?})", project.id, project.title);
        Ok(project)
    }

    pub async fn update(&mut self, id: i64, patch: UpdateProject) -> ApiResult<StoredProject> {
        self.simulate_latency().await;
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ApiError::NotFound(id))?;

        if let Some(title) = patch.title {
            project.title = title;
        }
        if let Some(description) = patch.description {
            project.description = description;
        }
        if let Some(image) = patch.image {
            project.image = image;
        }
        if let Some(tags) = patch.tags {
            project.tags = tags;
        }
        if let Some(technologies) = patch.technologies {
            project.technologies = technologies;
        }
        if let Some(github) = patch.github {
            project.github = Some(github);
        }
        if let Some(demo) = patch.demo {
            project.demo = Some(demo);
        }
        if let Some(status) = patch.status {
            project.status = status;
        }
        project.updated_at = Utc::now();

        let updated = project.clone();
        self.persist()?;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: i64) -> ApiResult<i64> {
        self.simulate_latency().await;
        let index = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(ApiError::NotFound(id))?;

        if self.projects[index].provenance == Provenance::Seed {
            return Err(ApiError::Rejected("Cannot delete seed projects".to_string()));
        }

        self.projects.remove(index);
        self.persist()?;
        info!("deleted project {}", id);
        Ok(id)
    }

    pub fn stats(&self) -> StoreStats {
        let seed = self
            .projects
            .iter()
            .filter(|p| p.provenance == Provenance::Seed)
            .count();
        StoreStats {
            total: self.projects.len(),
            seed,
            custom: self.projects.len() - seed,
        }
    }

    /// Re-serializes only the custom subset; seed entries are never written.
    fn persist(&self) -> ApiResult<()> {
        let custom: Vec<&StoredProject> = self
            .projects
            .iter()
            .filter(|p| p.provenance == Provenance::Custom)
            .collect();
        let json = serde_json::to_string_pretty(&custom)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        std::fs::write(&self.storage_path, json).map_err(|e| ApiError::Storage(e.to_string()))
    }
}

fn load_custom(path: &PathBuf) -> Vec<StoredProject> {
    if !path.exists() {
        return Vec::new();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    match serde_json::from_str::<Vec<StoredProject>>(&content) {
        Ok(mut custom) => {
            // Entries persisted before provenance existed deserialize as
            // Custom via the serde default, which is what they are.
            custom.retain(|p| p.provenance == Provenance::Custom);
            info!("loaded {} custom projects from {:?}", custom.len(), path);
            custom
        }
        Err(e) => {
            warn!("could not load custom projects: {}", e);
            Vec::new()
        }
    }
}

fn matches_query(p: &StoredProject, query: &ProjectQuery) -> bool {
    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        let hit = p.title.to_lowercase().contains(&needle)
            || p.description.to_lowercase().contains(&needle)
            || p.tags.iter().any(|t| t.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    if let Some(status) = query.status {
        if p.status != status {
            return false;
        }
    }
    if !query.tags.is_empty() && !query.tags.iter().any(|t| p.tags.contains(t)) {
        return false;
    }
    true
}
