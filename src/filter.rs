use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::model::Project;

/// Quiet period before a pending query is committed.
pub const DEBOUNCE: Duration = Duration::from_millis(250);

pub const DEFAULT_VISIBLE: usize = 9;
pub const LOAD_STEP: usize = 6;

/// Free-text + branch filter with an explicit pending → committed transition.
///
/// The UI mutates `query` directly and reports the edit via [`note_edit`];
/// [`tick`] commits the pending text once it has been quiet for [`DEBOUNCE`].
/// Branch selection is not debounced.
///
/// [`note_edit`]: ProjectFilter::note_edit
/// [`tick`]: ProjectFilter::tick
pub struct ProjectFilter {
    pub query: String,
    pub branch: String,
    committed_query: String,
    last_edit: Option<Instant>,
}

impl Default for ProjectFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectFilter {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            branch: String::new(),
            committed_query: String::new(),
            last_edit: None,
        }
    }

    pub fn committed_query(&self) -> &str {
        &self.committed_query
    }

    pub fn note_edit(&mut self, now: Instant) {
        self.last_edit = Some(now);
    }

    /// Commits the pending query once the quiet period has elapsed.
    /// Returns true when the committed copy changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.query == self.committed_query {
            self.last_edit = None;
            return false;
        }
        match self.last_edit {
            Some(edited) if now.duration_since(edited) >= DEBOUNCE => {
                self.committed_query = self.query.clone();
                self.last_edit = None;
                true
            }
            // No recorded edit means the query was set programmatically;
            // restoration paths call commit_now instead.
            _ => false,
        }
    }

    /// Applies the pending query immediately, bypassing the debounce.
    pub fn commit_now(&mut self) {
        self.committed_query = self.query.clone();
        self.last_edit = None;
    }

    pub fn is_active(&self) -> bool {
        !self.committed_query.trim().is_empty() || !self.branch.is_empty()
    }

    pub fn reset(&mut self) {
        self.query.clear();
        self.committed_query.clear();
        self.branch.clear();
        self.last_edit = None;
    }

    /// Case-insensitive substring match over title, description, and tags,
    /// conjunctive with exact branch membership. Input order is preserved.
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        let needle = self.committed_query.trim().to_lowercase();
        projects
            .iter()
            .filter(|p| {
                (needle.is_empty() || matches_text(p, &needle))
                    && (self.branch.is_empty() || p.branches.iter().any(|b| *b == self.branch))
            })
            .collect()
    }

    /// Sorted union of every project's branches.
    pub fn branches(projects: &[Project]) -> Vec<String> {
        let set: BTreeSet<&String> = projects.iter().flat_map(|p| p.branches.iter()).collect();
        set.into_iter().cloned().collect()
    }
}

fn matches_text(p: &Project, needle: &str) -> bool {
    p.title.to_lowercase().contains(needle)
        || p.description.to_lowercase().contains(needle)
        || p.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

/// Incremental "load more" window over a filtered list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    visible: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new()
    }
}

impl Pagination {
    pub fn new() -> Self {
        Self {
            visible: DEFAULT_VISIBLE,
        }
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn set_visible(&mut self, count: usize) {
        if count > 0 {
            self.visible = count;
        }
    }

    pub fn load_more(&mut self) {
        self.visible += LOAD_STEP;
    }

    pub fn reset(&mut self) {
        self.visible = DEFAULT_VISIBLE;
    }

    /// Extends the window so `index` falls inside it, rounding up to a
    /// multiple of the load step. Never shrinks.
    pub fn ensure_visible(&mut self, index: usize) {
        let needed = index + 1;
        let next = needed.div_ceil(LOAD_STEP) * LOAD_STEP;
        if next > self.visible {
            self.visible = next;
        }
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible.min(items.len())]
    }

    pub fn has_more(&self, filtered_len: usize) -> bool {
        self.visible < filtered_len
    }
}
