use std::collections::HashMap;
use std::time::Instant;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::filter::{Pagination, ProjectFilter, DEFAULT_VISIBLE};

pub const LIST_STATE_KEY: &str = "projects:list_state";
pub const LAST_VIEWED_KEY: &str = "projects:last_viewed_id";

/// Session-scoped key/value store. Lives only as long as the app instance,
/// mirroring what a browser keeps per tab.
#[derive(Default)]
pub struct SessionStore {
    values: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}

fn default_visible() -> usize {
    DEFAULT_VISIBLE
}

/// Snapshot of the Projects page taken when navigating away from it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ListState {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default = "default_visible")]
    pub visible: usize,
    #[serde(default)]
    pub scroll_offset: f32,
    pub saved_at: i64,
}

impl ListState {
    pub fn new(query: String, branch: String, visible: usize, scroll_offset: f32) -> Self {
        Self {
            query,
            branch,
            visible,
            scroll_offset,
            saved_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

pub fn save_list_state(session: &mut SessionStore, state: &ListState) {
    match serde_json::to_string(state) {
        Ok(json) => session.set(LIST_STATE_KEY, json),
        Err(e) => debug!("persist list state failed: {}", e),
    }
}

/// Removes and returns the saved list state, so a restore can never leak
/// into an unrelated navigation.
pub fn take_list_state(session: &mut SessionStore) -> Option<ListState> {
    let raw = session.remove(LIST_STATE_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(state) => Some(state),
        Err(e) => {
            debug!("restore list state failed: {}", e);
            None
        }
    }
}

/// Snapshots the listing page state when navigating away from it.
pub fn snapshot_list(
    session: &mut SessionStore,
    filter: &ProjectFilter,
    pagination: &Pagination,
    scroll_offset: f32,
) {
    let state = ListState::new(
        filter.query.clone(),
        filter.branch.clone(),
        pagination.visible(),
        scroll_offset,
    );
    save_list_state(session, &state);
}

/// Reapplies a saved snapshot to the filter and window. The restored query
/// is committed directly, so the next debounce tick sees no change and the
/// restored count survives. Without a snapshot both reset to defaults.
/// Returns the saved scroll offset when a snapshot existed.
pub fn restore_list(
    session: &mut SessionStore,
    filter: &mut ProjectFilter,
    pagination: &mut Pagination,
) -> Option<f32> {
    match take_list_state(session) {
        Some(state) => {
            filter.query = state.query;
            filter.branch = state.branch;
            filter.commit_now();
            pagination.set_visible(state.visible);
            Some(state.scroll_offset)
        }
        None => {
            filter.reset();
            pagination.reset();
            None
        }
    }
}

/// Per-frame upkeep: commits a quiet query edit and collapses the window
/// back to the first page when the committed text changed.
pub fn tick_list(filter: &mut ProjectFilter, pagination: &mut Pagination, now: Instant) -> bool {
    if filter.tick(now) {
        pagination.reset();
        true
    } else {
        false
    }
}

pub fn save_last_viewed(session: &mut SessionStore, id: i64) {
    session.set(LAST_VIEWED_KEY, id.to_string());
}

pub fn take_last_viewed(session: &mut SessionStore) -> Option<i64> {
    session.remove(LAST_VIEWED_KEY)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_state_roundtrip_and_clear() {
        let mut session = SessionStore::new();
        let state = ListState::new("shop".into(), "web".into(), 15, 420.5);
        save_list_state(&mut session, &state);

        let restored = take_list_state(&mut session).unwrap();
        assert_eq!(restored, state);

        // Cleared after restore.
        assert!(take_list_state(&mut session).is_none());
    }

    #[test]
    fn test_corrupt_state_is_dropped() {
        let mut session = SessionStore::new();
        session.set(LIST_STATE_KEY, "{not json".into());
        assert!(take_list_state(&mut session).is_none());
        assert!(session.get(LIST_STATE_KEY).is_none());
    }

    #[test]
    fn test_last_viewed_roundtrip() {
        let mut session = SessionStore::new();
        save_last_viewed(&mut session, 1003);
        assert_eq!(take_last_viewed(&mut session), Some(1003));
        assert_eq!(take_last_viewed(&mut session), None);
    }

    #[test]
    fn test_list_state_defaults_on_partial_payload() {
        let state: ListState = serde_json::from_str(r#"{ "saved_at": 0 }"#).unwrap();
        assert_eq!(state.visible, DEFAULT_VISIBLE);
        assert!(state.query.is_empty());
        assert!(state.branch.is_empty());
    }

    #[test]
    fn test_restore_reapplies_state_and_keeps_count_through_tick() {
        let mut session = SessionStore::new();
        let mut filter = ProjectFilter::new();
        let mut pagination = Pagination::new();

        filter.query = "shop".into();
        filter.commit_now();
        filter.branch = "web".into();
        pagination.load_more();
        snapshot_list(&mut session, &filter, &pagination, 420.5);

        let mut filter = ProjectFilter::new();
        let mut pagination = Pagination::new();
        let scroll = restore_list(&mut session, &mut filter, &mut pagination);

        assert_eq!(scroll, Some(420.5));
        assert_eq!(filter.query, "shop");
        assert_eq!(filter.committed_query(), "shop");
        assert_eq!(filter.branch, "web");
        assert_eq!(pagination.visible(), DEFAULT_VISIBLE + crate::filter::LOAD_STEP);

        // The restored query is already committed, so the next tick must not
        // collapse the window.
        assert!(!tick_list(&mut filter, &mut pagination, Instant::now()));
        assert_eq!(pagination.visible(), DEFAULT_VISIBLE + crate::filter::LOAD_STEP);

        // Snapshot is single-use; the next entry starts from defaults.
        let scroll = restore_list(&mut session, &mut filter, &mut pagination);
        assert_eq!(scroll, None);
        assert!(filter.query.is_empty());
        assert_eq!(pagination.visible(), DEFAULT_VISIBLE);
    }

    #[test]
    fn test_committed_edit_after_restore_resets_count() {
        let mut session = SessionStore::new();
        let mut filter = ProjectFilter::new();
        let mut pagination = Pagination::new();

        filter.query = "shop".into();
        filter.commit_now();
        pagination.load_more();
        snapshot_list(&mut session, &filter, &pagination, 0.0);

        let mut filter = ProjectFilter::new();
        let mut pagination = Pagination::new();
        restore_list(&mut session, &mut filter, &mut pagination);

        // A fresh user edit goes through the debounce and, once committed,
        // collapses the window back to the first page.
        let t0 = Instant::now();
        filter.query = "blog".into();
        filter.note_edit(t0);
        assert!(!tick_list(&mut filter, &mut pagination, t0));
        assert!(tick_list(&mut filter, &mut pagination, t0 + crate::filter::DEBOUNCE));
        assert_eq!(filter.committed_query(), "blog");
        assert_eq!(pagination.visible(), DEFAULT_VISIBLE);
    }

    #[test]
    fn test_restore_widens_window_to_reveal_last_viewed() {
        let mut session = SessionStore::new();
        let mut filter = ProjectFilter::new();
        let mut pagination = Pagination::new();

        snapshot_list(&mut session, &filter, &pagination, 0.0);
        save_last_viewed(&mut session, 1007);

        restore_list(&mut session, &mut filter, &mut pagination);
        assert_eq!(pagination.visible(), DEFAULT_VISIBLE);

        // The entry sits at index 10 of the filtered list, past the default
        // window; revealing it rounds up to the next load step.
        let anchor = take_last_viewed(&mut session).unwrap();
        assert_eq!(anchor, 1007);
        pagination.ensure_visible(10);
        assert_eq!(pagination.visible(), 12);
    }
}
