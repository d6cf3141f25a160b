// ── Filter descriptor ──
//
// The search/sort/pagination query the list view is derived from,
// plus the watch-backed holder the controller mutates.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tokio::sync::watch;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Field the derived view is sorted by.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortKey {
    #[default]
    CreatedAt,
    Title,
    UpdatedAt,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Fully populated search/sort/pagination query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterDescriptor {
    pub search: String,
    pub sort_by: SortKey,
    pub sort_direction: SortDirection,
    pub page: u32,
    pub per_page: u32,
}

impl Default for FilterDescriptor {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_by: SortKey::default(),
            sort_direction: SortDirection::default(),
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl FilterDescriptor {
    /// Shallow-merge `patch` into a copy of `self`.
    pub fn merged(&self, patch: FilterPatch) -> Self {
        Self {
            search: patch.search.unwrap_or_else(|| self.search.clone()),
            sort_by: patch.sort_by.unwrap_or(self.sort_by),
            sort_direction: patch.sort_direction.unwrap_or(self.sort_direction),
            page: patch.page.unwrap_or(self.page),
            per_page: patch.per_page.unwrap_or(self.per_page),
        }
        .normalized()
    }

    /// Clamp `page` and `per_page` to at least 1.
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.per_page = self.per_page.max(1);
        self
    }
}

/// Partial update for a [`FilterDescriptor`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub sort_by: Option<SortKey>,
    pub sort_direction: Option<SortDirection>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl FilterPatch {
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort_by = Some(key);
        self
    }

    pub fn sort_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = Some(direction);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ── Watch-backed holder ─────────────────────────────────────────────

/// The live descriptor. Subscribers are notified only when a write
/// actually changes it.
pub(crate) struct FilterState {
    tx: watch::Sender<FilterDescriptor>,
}

impl FilterState {
    pub(crate) fn new(initial: FilterDescriptor) -> Self {
        let (tx, _) = watch::channel(initial.normalized());
        Self { tx }
    }

    pub(crate) fn get(&self) -> FilterDescriptor {
        self.tx.borrow().clone()
    }

    /// Replace the descriptor. Returns `true` if it changed.
    pub(crate) fn replace(&self, next: FilterDescriptor) -> bool {
        let next = next.normalized();
        self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }

    /// Merge a patch. Returns `true` if the descriptor changed.
    pub(crate) fn merge(&self, patch: FilterPatch) -> bool {
        self.tx.send_if_modified(|current| {
            let next = current.merged(patch);
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<FilterDescriptor> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_documented_values() {
        let d = FilterDescriptor::default();
        assert_eq!(d.search, "");
        assert_eq!(d.sort_by, SortKey::CreatedAt);
        assert_eq!(d.sort_direction, SortDirection::Desc);
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 10);
    }

    #[test]
    fn wire_names_are_exact() {
        assert_eq!(SortKey::CreatedAt.as_ref(), "createdAt");
        assert_eq!(SortKey::UpdatedAt.as_ref(), "updatedAt");
        assert_eq!(SortKey::Title.as_ref(), "title");
        assert_eq!(SortDirection::Asc.as_ref(), "asc");
        assert_eq!("updatedAt".parse::<SortKey>().unwrap(), SortKey::UpdatedAt);
    }

    #[test]
    fn merge_is_shallow_and_keeps_other_fields() {
        let base = FilterDescriptor {
            search: "alp".into(),
            sort_by: SortKey::Title,
            sort_direction: SortDirection::Asc,
            page: 3,
            per_page: 25,
        };
        let merged = base.merged(FilterPatch::default().page(4));
        assert_eq!(
            merged,
            FilterDescriptor {
                page: 4,
                ..base.clone()
            }
        );
    }

    #[test]
    fn merge_clamps_page_and_per_page() {
        let merged = FilterDescriptor::default().merged(FilterPatch::default().page(0).per_page(0));
        assert_eq!(merged.page, 1);
        assert_eq!(merged.per_page, 1);
    }

    #[test]
    fn state_notifies_only_on_change() {
        let state = FilterState::new(FilterDescriptor::default());
        let mut rx = state.subscribe();

        assert!(!state.merge(FilterPatch::default().page(1)));
        assert!(!rx.has_changed().unwrap());

        assert!(state.merge(FilterPatch::default().search("beta")));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().search, "beta");
    }

    #[test]
    fn concurrent_merges_do_not_lose_fields() {
        let state = FilterState::new(FilterDescriptor::default());
        std::thread::scope(|scope| {
            scope.spawn(|| {
                for page in 2..=500 {
                    state.merge(FilterPatch::default().page(page));
                }
            });
            scope.spawn(|| {
                for per_page in 2..=500 {
                    state.merge(FilterPatch::default().per_page(per_page));
                }
            });
        });
        let d = state.get();
        assert_eq!((d.page, d.per_page), (500, 500));
    }

    #[test]
    fn patch_deserializes_from_partial_json() {
        let patch: FilterPatch = serde_json::from_str(r#"{ "sortBy": "title" }"#).unwrap();
        assert_eq!(patch, FilterPatch::default().sort_by(SortKey::Title));
        assert!(!patch.is_empty());
    }
}
